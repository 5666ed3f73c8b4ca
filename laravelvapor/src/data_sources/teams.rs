//! Teams data source

use crate::api::Team;
use crate::provider_data::{not_configured, VaporProviderData};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    ReadDataSourceRequest, ReadDataSourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::DynamicValue;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TeamsModel {
    pub id: String,
    pub teams: Vec<TeamModel>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamModel {
    pub id: i64,
    pub name: Option<String>,
    pub aws_external_id: Option<String>,
    pub sentry_organization_name: Option<String>,
    pub sentry_organization_region: Option<String>,
    pub owner_id: Option<i64>,
    pub owner_email: Option<String>,
}

impl From<Team> for TeamModel {
    fn from(team: Team) -> Self {
        let (owner_id, owner_email) = match team.owner {
            Some(owner) => (Some(owner.id), owner.email),
            None => (None, None),
        };

        Self {
            id: team.id,
            name: team.name,
            aws_external_id: team.aws_external_id,
            sentry_organization_name: team.sentry_organization_name,
            sentry_organization_region: team.sentry_organization_region,
            owner_id,
            owner_email,
        }
    }
}

#[derive(Default)]
pub struct TeamsDataSource {
    provider_data: Option<VaporProviderData>,
}

impl TeamsDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for TeamsDataSource {
    fn type_name(&self) -> &str {
        "laravelvapor_teams"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: format!("{}_teams", request.provider_type_name),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let team_type = AttributeType::Object(BTreeMap::from([
            ("id".to_string(), AttributeType::Number),
            ("name".to_string(), AttributeType::String),
            ("aws_external_id".to_string(), AttributeType::String),
            ("sentry_organization_name".to_string(), AttributeType::String),
            ("sentry_organization_region".to_string(), AttributeType::String),
            ("owner_id".to_string(), AttributeType::Number),
            ("owner_email".to_string(), AttributeType::String),
        ]));

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Lists the teams the API token's account can access")
            .attribute(AttributeBuilder::string("id").computed().build())
            .attribute(
                AttributeBuilder::new("teams", AttributeType::List(Box::new(team_type)))
                    .computed()
                    .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        match VaporProviderData::from_provider_data(self.type_name(), request.provider_data) {
            Ok(data) => {
                self.provider_data = data;
                ConfigureDataSourceResponse {
                    diagnostics: vec![],
                }
            }
            Err(diagnostic) => ConfigureDataSourceResponse {
                diagnostics: vec![diagnostic],
            },
        }
    }

    async fn read(&self, _ctx: Context, _request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return ReadDataSourceResponse {
                state: DynamicValue::null(),
                diagnostics: vec![not_configured()],
            };
        };

        let teams = match provider_data.client.get_teams().await {
            Ok(teams) => teams,
            Err(e) => {
                return ReadDataSourceResponse::error(
                    "Unable to read teams",
                    format!("API error: {}", e),
                )
            }
        };
        tracing::debug!("Read {} teams", teams.len());

        let model = TeamsModel {
            id: "teams".to_string(),
            teams: teams.into_iter().map(TeamModel::from).collect(),
        };

        match DynamicValue::encode(&model) {
            Ok(state) => ReadDataSourceResponse {
                state,
                diagnostics: vec![],
            },
            Err(e) => ReadDataSourceResponse::error("Unable to encode teams state", e.to_string()),
        }
    }
}
