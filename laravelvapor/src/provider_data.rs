//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::any::Any;
use std::sync::Arc;
use tfplug::Diagnostic;

#[derive(Clone)]
pub struct VaporProviderData {
    pub client: Arc<Client>,
}

impl VaporProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Extracts the shared data handed down by the provider.
    ///
    /// `Ok(None)` means the provider has not been configured yet; the
    /// caller reports that once an operation actually needs the client.
    pub fn from_provider_data(
        type_name: &str,
        data: Option<Arc<dyn Any + Send + Sync>>,
    ) -> Result<Option<Self>, Diagnostic> {
        let Some(data) = data else {
            tracing::warn!("No provider data provided to {}", type_name);
            return Ok(None);
        };

        match data.downcast_ref::<VaporProviderData>() {
            Some(provider_data) => Ok(Some(provider_data.clone())),
            None => {
                tracing::error!("Failed to downcast provider data for {}", type_name);
                Err(Diagnostic::error(
                    "Unexpected provider data type",
                    format!(
                        "Expected VaporProviderData when configuring {}. Please report this issue to the provider developers.",
                        type_name
                    ),
                ))
            }
        }
    }
}

pub fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "The provider has not been configured with a Vapor API token",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcasts_vapor_provider_data() {
        let client = Client::new(None, "token").unwrap();
        let data: Arc<dyn Any + Send + Sync> = Arc::new(VaporProviderData::new(client));

        let extracted = VaporProviderData::from_provider_data("laravelvapor_account", Some(data))
            .unwrap()
            .unwrap();
        assert_eq!(
            extracted.client.base_url().as_str(),
            "https://vapor.laravel.com/"
        );
    }

    #[test]
    fn missing_data_is_not_an_error() {
        let result = VaporProviderData::from_provider_data("laravelvapor_account", None);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn wrong_data_type_is_an_error() {
        let data: Arc<dyn Any + Send + Sync> = Arc::new("not provider data");
        let err = VaporProviderData::from_provider_data("laravelvapor_zone", Some(data))
            .err()
            .unwrap();
        assert!(err.is_error());
        assert!(err.detail.contains("laravelvapor_zone"));
    }
}
