//! Placeholder resource that keeps its state locally

use super::{decode_model, encode_model};
use crate::provider_data::VaporProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tfplug::context::Context;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, SchemaBuilder};
use tfplug::types::DynamicValue;

const EXAMPLE_ID: &str = "example-id";

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleModel {
    #[serde(default)]
    pub configurable_attribute: Option<String>,
    #[serde(default)]
    pub defaulted: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Default)]
pub struct ExampleResource;

impl ExampleResource {
    pub fn new() -> Self {
        Self
    }

    fn apply(planned_state: &DynamicValue) -> (DynamicValue, Vec<tfplug::Diagnostic>) {
        let mut model: ExampleModel = match decode_model(planned_state) {
            Ok(model) => model,
            Err(diagnostic) => return (planned_state.clone(), vec![diagnostic]),
        };
        model.id = Some(EXAMPLE_ID.to_string());

        match encode_model(&model) {
            Ok(state) => (state, vec![]),
            Err(diagnostic) => (planned_state.clone(), vec![diagnostic]),
        }
    }
}

#[async_trait]
impl Resource for ExampleResource {
    fn type_name(&self) -> &str {
        "laravelvapor_example"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: format!("{}_example", request.provider_type_name),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Example resource")
            .attribute(
                AttributeBuilder::string("configurable_attribute")
                    .description("Example configurable attribute")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("defaulted")
                    .description("Example configurable attribute with default value")
                    .optional()
                    .default_value("example value")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("id")
                    .description("Example identifier")
                    .computed()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    /// State stays local and the client is never used
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let data = VaporProviderData::from_provider_data(self.type_name(), request.provider_data);
        ConfigureResourceResponse {
            diagnostics: data.err().into_iter().collect(),
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let (new_state, diagnostics) = Self::apply(&request.planned_state);
        tracing::trace!("created an example resource");
        CreateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        ReadResourceResponse {
            new_state: Some(request.current_state),
            diagnostics: vec![],
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let (new_state, diagnostics) = Self::apply(&request.planned_state);
        UpdateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        _request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use std::any::Any;
    use std::sync::Arc;
    use tfplug::AttributePath;

    #[tokio::test]
    async fn create_sets_the_fixed_id() {
        let resource = ExampleResource::new();
        let mut planned = DynamicValue::empty_object();
        planned
            .set_string(&AttributePath::new("configurable_attribute"), "x".to_string())
            .unwrap();
        planned
            .set_string(&AttributePath::new("defaulted"), "example value".to_string())
            .unwrap();

        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "laravelvapor_example".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        let model: ExampleModel = response.new_state.decode().unwrap();
        assert_eq!(
            model,
            ExampleModel {
                configurable_attribute: Some("x".to_string()),
                defaulted: Some("example value".to_string()),
                id: Some("example-id".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn schema_defaults_the_defaulted_attribute() {
        let schema = ExampleResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema;

        let mut plan = DynamicValue::null();
        schema.apply_defaults(&mut plan);
        assert_eq!(
            plan.get_string(&AttributePath::new("defaulted")).unwrap(),
            "example value"
        );
        assert!(schema.attribute("id").map(|a| a.computed).unwrap_or(false));
    }

    #[tokio::test]
    async fn configure_rejects_foreign_provider_data() {
        let mut resource = ExampleResource::new();
        let data: Arc<dyn Any + Send + Sync> = Arc::new("not provider data");

        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(data),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "Unexpected provider data type"
        );
    }

    #[tokio::test]
    async fn configure_accepts_vapor_provider_data_or_none() {
        let mut resource = ExampleResource::new();
        let data: Arc<dyn Any + Send + Sync> = Arc::new(VaporProviderData::new(
            create_test_client("https://vapor.test"),
        ));

        let configured = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(data),
                },
            )
            .await;
        assert!(configured.diagnostics.is_empty());

        let unconfigured = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: None,
                },
            )
            .await;
        assert!(unconfigured.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn read_returns_current_state() {
        let mut state = DynamicValue::empty_object();
        state
            .set_string(&AttributePath::new("id"), EXAMPLE_ID.to_string())
            .unwrap();

        let response = ExampleResource::new()
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "laravelvapor_example".to_string(),
                    current_state: state.clone(),
                },
            )
            .await;

        assert_eq!(response.new_state, Some(state));
    }
}
