//! DNS zone resource

use super::{api_error, decode_model, encode_model, requires_replacement};
use crate::api::common::null_as_default;
use crate::api::{Client, Zone};
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
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneModel {
    pub team_id: i64,
    pub cloud_provider_id: i64,
    pub zone: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub ses_verified: Option<bool>,
    #[serde(default)]
    pub records_count: Option<i64>,
}

impl ZoneModel {
    fn with_remote(mut self, remote: Zone) -> Self {
        self.id = Some(remote.id);
        if remote.team_id != 0 {
            self.team_id = remote.team_id;
        }
        if remote.cloud_provider_id != 0 {
            self.cloud_provider_id = remote.cloud_provider_id;
        }
        if let Some(zone) = remote.zone {
            self.zone = zone;
        }
        self.zone_id = remote.zone_id;
        self.nameservers = remote.nameservers;
        self.ses_verified = remote.ses_verified;
        self.records_count = remote.records_count;
        self
    }
}

#[derive(Default)]
pub struct ZoneResource {
    provider_data: Option<VaporProviderData>,
}

impl ZoneResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(|data| data.client.as_ref())
            .ok_or_else(not_configured)
    }

    async fn create_zone(&self, planned_state: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = self.client()?;
        let model: ZoneModel = decode_model(planned_state)?;

        tracing::debug!("Creating zone {} in team {}", model.zone, model.team_id);
        let created = client
            .create_zone(model.team_id, model.cloud_provider_id, &model.zone)
            .await
            .map_err(|e| api_error("Unable to create zone", &e))?;

        encode_model(&model.with_remote(created))
    }

    async fn refresh(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = self.client()?;
        let model: ZoneModel = decode_model(state)?;
        let Some(id) = model.id else {
            return Ok(None);
        };

        match client.get_zone(id).await {
            Ok(remote) => encode_model(&model.with_remote(remote)).map(Some),
            Err(e) if e.is_not_found() => {
                tracing::info!("Zone {} no longer exists", id);
                Ok(None)
            }
            Err(e) => Err(api_error("Unable to read zone", &e)),
        }
    }

    async fn remove(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = self.client()?;
        let model: ZoneModel = decode_model(state)?;
        let Some(id) = model.id else {
            return Ok(());
        };

        match client.remove_zone(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(api_error("Unable to delete zone", &e)),
        }
    }
}

#[async_trait]
impl Resource for ZoneResource {
    fn type_name(&self) -> &str {
        "laravelvapor_zone"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: format!("{}_zone", request.provider_type_name),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a DNS zone hosted through Vapor")
            .attribute(AttributeBuilder::number("team_id").required().build())
            .attribute(
                AttributeBuilder::number("cloud_provider_id")
                    .description("Cloud provider that hosts the zone")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("zone")
                    .description("Domain name, e.g. example.com")
                    .required()
                    .build(),
            )
            .attribute(AttributeBuilder::number("id").computed().build())
            .attribute(
                AttributeBuilder::string("zone_id")
                    .description("Hosted zone identifier at the cloud provider")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "nameservers",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .computed()
                .build(),
            )
            .attribute(AttributeBuilder::bool("ses_verified").computed().build())
            .attribute(AttributeBuilder::number("records_count").computed().build())
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
        match self.create_zone(&request.planned_state).await {
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
