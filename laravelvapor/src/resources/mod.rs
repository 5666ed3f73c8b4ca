pub mod cloud_provider;
pub mod example;
pub mod team_member;
pub mod zone;
pub mod zone_record;

pub use cloud_provider::CloudProviderResource;
pub use example::ExampleResource;
pub use team_member::TeamMemberResource;
pub use zone::ZoneResource;
pub use zone_record::ZoneRecordResource;

use crate::api::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tfplug::{Diagnostic, DynamicValue};

/// Decodes config, plan or state into a resource model
pub(crate) fn decode_model<T: DeserializeOwned>(value: &DynamicValue) -> Result<T, Diagnostic> {
    value
        .decode()
        .map_err(|e| Diagnostic::error("Invalid resource data", e.to_string()))
}

pub(crate) fn encode_model<T: Serialize>(model: &T) -> Result<DynamicValue, Diagnostic> {
    DynamicValue::encode(model)
        .map_err(|e| Diagnostic::error("Unable to encode resource state", e.to_string()))
}

pub(crate) fn api_error(summary: &str, err: &ApiError) -> Diagnostic {
    tracing::error!("{}: {}", summary, err);
    Diagnostic::error(summary, format!("API error: {}", err))
}

pub(crate) fn requires_replacement(type_name: &str) -> Diagnostic {
    Diagnostic::error(
        "Update not supported",
        format!(
            "{} cannot be changed in place; the resource must be replaced",
            type_name
        ),
    )
}
