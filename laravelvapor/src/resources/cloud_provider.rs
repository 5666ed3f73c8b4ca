//! Cloud provider resource: links an AWS account to a Vapor team

use super::{api_error, decode_model, encode_model, requires_replacement};
use crate::api::{Client, CloudProvider};
use crate::provider_data::{not_configured, VaporProviderData};
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
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudProviderModel {
    pub team_id: i64,
    #[serde(rename = "type", default)]
    pub provider_type: Option<String>,
    pub name: String,
    pub key: String,
    pub secret: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub role_arn: Option<String>,
    #[serde(default)]
    pub network_limit: Option<i64>,
    #[serde(default)]
    pub queued_for_deletion: Option<bool>,
}

impl CloudProviderModel {
    /// Remote attributes win; the key pair is never returned so it stays as
    /// configured
    fn with_remote(mut self, remote: CloudProvider) -> Self {
        self.id = Some(remote.id);
        if remote.team_id != 0 {
            self.team_id = remote.team_id;
        }
        if let Some(name) = remote.name {
            self.name = name;
        }
        if remote.provider_type.is_some() {
            self.provider_type = remote.provider_type;
        }
        self.uuid = remote.uuid;
        self.role_arn = remote.role_arn;
        self.network_limit = remote.network_limit;
        self.queued_for_deletion = remote.queued_for_deletion;
        self
    }
}

#[derive(Default)]
pub struct CloudProviderResource {
    provider_data: Option<VaporProviderData>,
}

impl CloudProviderResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(|data| data.client.as_ref())
            .ok_or_else(not_configured)
    }

    async fn create_provider(
        &self,
        planned_state: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let client = self.client()?;
        let model: CloudProviderModel = decode_model(planned_state)?;

        let request = CloudProvider {
            provider_type: model.provider_type.clone(),
            name: Some(model.name.clone()),
            ..CloudProvider::default()
        };

        tracing::debug!("Creating cloud provider {} in team {}", model.name, model.team_id);
        let created = client
            .create_provider(model.team_id, &request, &model.key, &model.secret)
            .await
            .map_err(|e| api_error("Unable to create cloud provider", &e))?;

        encode_model(&model.with_remote(created))
    }

    async fn refresh(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = self.client()?;
        let model: CloudProviderModel = decode_model(state)?;
        let Some(id) = model.id else {
            return Ok(None);
        };

        let providers = match client.get_providers(model.team_id).await {
            Ok(providers) => providers,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(api_error("Unable to read cloud providers", &e)),
        };

        match providers.into_iter().find(|p| p.id == id) {
            Some(remote) => encode_model(&model.with_remote(remote)).map(Some),
            None => {
                tracing::info!("Cloud provider {} no longer exists", id);
                Ok(None)
            }
        }
    }

    async fn remove(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = self.client()?;
        let model: CloudProviderModel = decode_model(state)?;
        let Some(id) = model.id else {
            return Ok(());
        };

        match client.remove_provider(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(api_error("Unable to delete cloud provider", &e)),
        }
    }
}

#[async_trait]
impl Resource for CloudProviderResource {
    fn type_name(&self) -> &str {
        "laravelvapor_cloud_provider"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: format!("{}_cloud_provider", request.provider_type_name),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Links a cloud account to a Vapor team")
            .attribute(AttributeBuilder::number("team_id").required().build())
            .attribute(
                AttributeBuilder::string("type")
                    .description("Cloud provider type")
                    .optional()
                    .default_value("aws")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name")
                    .description("Display name of the linked account")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("key")
                    .description("Access key ID")
                    .required()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("secret")
                    .description("Secret access key")
                    .required()
                    .sensitive()
                    .build(),
            )
            .attribute(AttributeBuilder::number("id").computed().build())
            .attribute(AttributeBuilder::string("uuid").computed().build())
            .attribute(AttributeBuilder::string("role_arn").computed().build())
            .attribute(AttributeBuilder::number("network_limit").computed().build())
            .attribute(AttributeBuilder::bool("queued_for_deletion").computed().build())
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        match VaporProviderData::from_provider_data(self.type_name(), request.provider_data) {
            Ok(data) => {
                self.provider_data = data;
                ConfigureResourceResponse {
                    diagnostics: vec![],
                }
            }
            Err(diagnostic) => ConfigureResourceResponse {
                diagnostics: vec![diagnostic],
            },
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        match self.create_provider(&request.planned_state).await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diagnostic) => CreateResourceResponse {
                new_state: DynamicValue::null(),
                diagnostics: vec![diagnostic],
            },
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.refresh(&request.current_state).await {
            Ok(new_state) => ReadResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diagnostic) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![diagnostic],
            },
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        UpdateResourceResponse {
            new_state: request.prior_state,
            diagnostics: vec![requires_replacement(self.type_name())],
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        DeleteResourceResponse {
            diagnostics: self
                .remove(&request.prior_state)
                .await
                .err()
                .into_iter()
                .collect(),
        }
    }
}
