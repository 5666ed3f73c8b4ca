//! Account data source: the user that owns the API token

use crate::api::Account;
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

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountModel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified_at: Option<String>,
    pub address_line_one: Option<String>,
    pub avatar_url: Option<String>,
    pub is_sandboxed: Option<bool>,
    pub teams: Vec<AccountTeamModel>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountTeamModel {
    pub id: i64,
    pub name: Option<String>,
}

impl From<Account> for AccountModel {
    fn from(account: Account) -> Self {
        Self {
            id: Some(account.id),
            name: account.name,
            email: account.email,
            email_verified_at: account.email_verified_at,
            address_line_one: account.address_line_one,
            avatar_url: account.avatar_url,
            is_sandboxed: account.sandboxed,
            teams: account
                .teams
                .into_iter()
                .map(|team| AccountTeamModel {
                    id: team.id,
                    name: team.name,
                })
                .collect(),
        }
    }
}

#[derive(Default)]
pub struct AccountDataSource {
    provider_data: Option<VaporProviderData>,
}

impl AccountDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for AccountDataSource {
    fn type_name(&self) -> &str {
        "laravelvapor_account"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: format!("{}_account", request.provider_type_name),
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
        ]));

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up the Laravel Vapor account that owns the API token")
            .attribute(
                AttributeBuilder::number("id")
                    .description("Account identifier")
                    .computed()
                    .build(),
            )
            .attribute(AttributeBuilder::string("name").computed().build())
            .attribute(AttributeBuilder::string("email").computed().build())
            .attribute(AttributeBuilder::string("email_verified_at").computed().build())
            .attribute(AttributeBuilder::string("address_line_one").computed().build())
            .attribute(AttributeBuilder::string("avatar_url").computed().build())
            .attribute(
                AttributeBuilder::bool("is_sandboxed")
                    .description("Whether the account is a sandbox account")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("teams", AttributeType::List(Box::new(team_type)))
                    .description("Teams the account belongs to")
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

        let account = match provider_data.client.get_account().await {
            Ok(account) => account,
            Err(e) => {
                return ReadDataSourceResponse::error(
                    "Unable to read account",
                    format!("API error: {}", e),
                )
            }
        };
        tracing::debug!("Read account {}", account.id);

        match DynamicValue::encode(&AccountModel::from(account)) {
            Ok(state) => ReadDataSourceResponse {
                state,
                diagnostics: vec![],
            },
            Err(e) => {
                ReadDataSourceResponse::error("Unable to encode account state", e.to_string())
            }
        }
    }
}
