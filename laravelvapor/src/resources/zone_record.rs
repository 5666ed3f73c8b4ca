//! DNS zone record resource
//!
//! The API has no endpoint to fetch a single record, and a record is
//! identified by its type, name and value rather than its id.

use super::{api_error, decode_model, encode_model};
use crate::api::{Client, ZoneRecord};
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
pub struct ZoneRecordModel {
    pub zone_id: i64,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub id: Option<i64>,
}

impl ZoneRecordModel {
    fn to_record(&self) -> ZoneRecord {
        ZoneRecord {
            id: self.id.unwrap_or_default(),
            zone_id: self.zone_id,
            record_type: Some(self.record_type.clone()),
            name: Some(self.name.clone()),
            value: Some(self.value.clone()),
        }
    }
}

#[derive(Default)]
pub struct ZoneRecordResource {
    provider_data: Option<VaporProviderData>,
}

impl ZoneRecordResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(|data| data.client.as_ref())
            .ok_or_else(not_configured)
    }

    async fn create_record(
        &self,
        planned_state: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let client = self.client()?;
        let mut model: ZoneRecordModel = decode_model(planned_state)?;
        model.id = None;

        tracing::debug!(
            "Creating {} record {} in zone {}",
            model.record_type,
            model.name,
            model.zone_id
        );
        let created = client
            .create_zone_record(&model.to_record())
            .await
            .map_err(|e| api_error("Unable to create zone record", &e))?;

        if created.id != 0 {
            model.id = Some(created.id);
        }
        encode_model(&model)
    }

    async fn remove(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = self.client()?;
        let model: ZoneRecordModel = decode_model(state)?;

        match client.remove_zone_record(&model.to_record()).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(api_error("Unable to delete zone record", &e)),
        }
    }
}

#[async_trait]
impl Resource for ZoneRecordResource {
    fn type_name(&self) -> &str {
        "laravelvapor_zone_record"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: format!("{}_zone_record", request.provider_type_name),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a DNS record in a Vapor zone")
            .attribute(AttributeBuilder::number("zone_id").required().build())
            .attribute(
                AttributeBuilder::string("type")
                    .description("Record type, e.g. A, CNAME, TXT")
                    .required()
                    .build(),
            )
            .attribute(AttributeBuilder::string("name").required().build())
            .attribute(AttributeBuilder::string("value").required().build())
            .attribute(AttributeBuilder::number("id").computed().build())
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
        match self.create_record(&request.planned_state).await {
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

    /// No single-record endpoint; state is trusted as stored
    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        ReadResourceResponse {
            new_state: Some(request.current_state),
            diagnostics: vec![],
        }
    }

    /// Records are keyed by type, name and value, so a change removes the
    /// old record and creates the new one
    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        if let Err(diagnostic) = self.remove(&request.prior_state).await {
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics: vec![diagnostic],
            };
        }

        match self.create_record(&request.planned_state).await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            // the old record is already gone, so nothing is left to track
            Err(diagnostic) => UpdateResourceResponse {
                new_state: DynamicValue::null(),
                diagnostics: vec![diagnostic],
            },
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
