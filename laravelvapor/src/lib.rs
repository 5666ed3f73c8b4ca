pub mod api;
pub mod data_sources;
pub mod provider_data;
pub mod resources;

pub use provider_data::VaporProviderData;

use async_trait::async_trait;
use serde::Deserialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory,
};
use tfplug::schema::{AttributeBuilder, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};
use tfplug::{DataSource, Provider, ProviderMetadataRequest, ProviderMetadataResponse, Resource};

/// Environment variable read when the provider block sets no `token`
pub const TOKEN_ENV_VAR: &str = "LARAVEL_VAPOR_TOKEN";

/// Provider configuration block
#[derive(Debug, Default, Deserialize)]
pub struct VaporConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

pub struct LaravelVaporProvider {
    version: String,
    provider_data: Option<VaporProviderData>,
}

impl Default for LaravelVaporProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LaravelVaporProvider {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            provider_data: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider_data.is_some()
    }
}

#[async_trait]
impl Provider for LaravelVaporProvider {
    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: "laravelvapor".to_string(),
            version: self.version.clone(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages Laravel Vapor teams, cloud providers and DNS")
            .attribute(
                AttributeBuilder::string("host")
                    .description("Vapor API host, defaults to https://vapor.laravel.com")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("token")
                    .description("Vapor API token. May also be set with LARAVEL_VAPOR_TOKEN")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let config: VaporConfig = match request.config.decode() {
            Ok(config) => config,
            Err(e) => {
                return ConfigureProviderResponse {
                    diagnostics: vec![Diagnostic::error(
                        "Invalid provider configuration",
                        e.to_string(),
                    )],
                    provider_data: None,
                }
            }
        };

        let token = config
            .token
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty()));

        let Some(token) = token else {
            let detail = format!(
                "token is required (set it in the provider block or the {} env var)",
                TOKEN_ENV_VAR
            );
            let diagnostic = Diagnostic::error("Missing API token", detail)
                .with_attribute(&AttributePath::new("token"));
            return ConfigureProviderResponse {
                diagnostics: vec![diagnostic],
                provider_data: None,
            };
        };

        match api::Client::new(config.host.as_deref(), &token) {
            Ok(client) => {
                tracing::info!("Configured Vapor API client for {}", client.base_url());
                let data = VaporProviderData::new(client);
                self.provider_data = Some(data.clone());
                let provider_data: Arc<dyn Any + Send + Sync> = Arc::new(data);
                ConfigureProviderResponse {
                    diagnostics: vec![],
                    provider_data: Some(provider_data),
                }
            }
            Err(e) => {
                let diagnostic = Diagnostic::error("Failed to create API client", e.to_string())
                    .with_attribute(&AttributePath::new("host"));
                ConfigureProviderResponse {
                    diagnostics: vec![diagnostic],
                    provider_data: None,
                }
            }
        }
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut factories: HashMap<String, DataSourceFactory> = HashMap::new();
        factories.insert(
            "laravelvapor_account".to_string(),
            Box::new(|| Box::new(data_sources::AccountDataSource::new()) as Box<dyn DataSource>),
        );
        factories.insert(
            "laravelvapor_teams".to_string(),
            Box::new(|| Box::new(data_sources::TeamsDataSource::new()) as Box<dyn DataSource>),
        );
        factories
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();
        factories.insert(
            "laravelvapor_example".to_string(),
            Box::new(|| Box::new(resources::ExampleResource::new()) as Box<dyn Resource>),
        );
        factories.insert(
            "laravelvapor_team_member".to_string(),
            Box::new(|| Box::new(resources::TeamMemberResource::new()) as Box<dyn Resource>),
        );
        factories.insert(
            "laravelvapor_cloud_provider".to_string(),
            Box::new(|| Box::new(resources::CloudProviderResource::new()) as Box<dyn Resource>),
        );
        factories.insert(
            "laravelvapor_zone".to_string(),
            Box::new(|| Box::new(resources::ZoneResource::new()) as Box<dyn Resource>),
        );
        factories.insert(
            "laravelvapor_zone_record".to_string(),
            Box::new(|| Box::new(resources::ZoneRecordResource::new()) as Box<dyn Resource>),
        );
        factories
    }
}
