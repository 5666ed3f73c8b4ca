//! Team member resource: invites an account into a team with permissions

use super::{api_error, decode_model, encode_model};
use crate::api::common::null_as_default;
use crate::api::{Account, Client};
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
pub struct TeamMemberModel {
    pub team_id: i64,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TeamMemberModel {
    fn with_account(mut self, account: &Account) -> Self {
        self.id = Some(account.id);
        self.name = account.name.clone();
        self
    }

    fn matches(&self, account: &Account) -> bool {
        account
            .email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(&self.email))
    }
}

#[derive(Default)]
pub struct TeamMemberResource {
    provider_data: Option<VaporProviderData>,
}

impl TeamMemberResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(|data| data.client.as_ref())
            .ok_or_else(not_configured)
    }

    async fn add(&self, planned_state: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = self.client()?;
        let model: TeamMemberModel = decode_model(planned_state)?;

        tracing::debug!("Adding {} to team {}", model.email, model.team_id);
        let account = client
            .add_team_member(model.team_id, &model.email, &model.permissions)
            .await
            .map_err(|e| api_error("Unable to add team member", &e))?;

        encode_model(&model.with_account(&account))
    }

    async fn refresh(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = self.client()?;
        let model: TeamMemberModel = decode_model(state)?;

        let members = match client.get_team_members(model.team_id).await {
            Ok(members) => members,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(api_error("Unable to read team members", &e)),
        };

        match members.iter().find(|account| model.matches(account)) {
            Some(account) => encode_model(&model.clone().with_account(account)).map(Some),
            None => {
                tracing::info!(
                    "{} is no longer a member of team {}",
                    model.email,
                    model.team_id
                );
                Ok(None)
            }
        }
    }

    /// Removing a member that is already gone succeeds
    async fn remove(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = self.client()?;
        let model: TeamMemberModel = decode_model(state)?;

        match client.remove_team_member(model.team_id, &model.email).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(api_error("Unable to remove team member", &e)),
        }
    }
}

#[async_trait]
impl Resource for TeamMemberResource {
    fn type_name(&self) -> &str {
        "laravelvapor_team_member"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: format!("{}_team_member", request.provider_type_name),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages membership of an account in a Vapor team")
            .attribute(
                AttributeBuilder::number("team_id")
                    .description("Team to add the member to")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("email")
                    .description("Email address of the member")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "permissions",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .description("Permissions granted to the member, e.g. view-projects")
                .required()
                .build(),
            )
            .attribute(
                AttributeBuilder::number("id")
                    .description("Account identifier of the member")
                    .computed()
                    .build(),
            )
            .attribute(AttributeBuilder::string("name").computed().build())
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
        match self.add(&request.planned_state).await {
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

    /// Membership has no update endpoint, so the prior member is removed
    /// and the planned one added
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

        match self.add(&request.planned_state).await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            // the prior member is already removed, so nothing is left to track
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use tfplug::AttributePath;

    async fn configured(url: &str) -> TeamMemberResource {
        let mut resource = TeamMemberResource::new();
        let data: Arc<dyn std::any::Any + Send + Sync> =
            Arc::new(VaporProviderData::new(create_test_client(url)));
        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(data),
                },
            )
            .await;
        assert!(response.diagnostics.is_empty());
        resource
    }

    fn member_state(email: &str) -> DynamicValue {
        DynamicValue::encode(&TeamMemberModel {
            team_id: 3,
            email: email.to_string(),
            permissions: vec!["view-projects".to_string()],
            id: None,
            name: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn create_adds_member_and_records_account_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/teams/3/members")
            .match_body(Matcher::Json(serde_json::json!({
                "email": "dev@example.com",
                "permissions": ["view-projects"]
            })))
            .with_body(r#"{"id":44,"name":"Dev","email":"dev@example.com"}"#)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let state = member_state("dev@example.com");
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "laravelvapor_team_member".to_string(),
                    planned_state: state.clone(),
                    config: state,
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response
                .new_state
                .get_number(&AttributePath::new("id"))
                .unwrap(),
            44.0
        );
        assert_eq!(
            response
                .new_state
                .get_string(&AttributePath::new("name"))
                .unwrap(),
            "Dev"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn read_drops_state_when_member_is_gone() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/3/members")
            .with_body(r#"[{"id":1,"email":"someone-else@example.com"}]"#)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "laravelvapor_team_member".to_string(),
                    current_state: member_state("dev@example.com"),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn read_refreshes_member_found_by_email() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/3/members")
            .with_body(r#"[{"id":44,"name":"Dev","email":"Dev@Example.com"}]"#)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "laravelvapor_team_member".to_string(),
                    current_state: member_state("dev@example.com"),
                },
            )
            .await;

        let model: TeamMemberModel = response.new_state.unwrap().decode().unwrap();
        assert_eq!(model.id, Some(44));
        assert_eq!(model.permissions, vec!["view-projects".to_string()]);
    }

    #[tokio::test]
    async fn update_replaces_membership() {
        let mut server = Server::new_async().await;
        let remove = server
            .mock("DELETE", "/api/teams/3/members")
            .match_body(Matcher::Json(serde_json::json!({"email": "old@example.com"})))
            .with_status(204)
            .create_async()
            .await;
        let add = server
            .mock("POST", "/api/teams/3/members")
            .match_body(Matcher::PartialJson(
                serde_json::json!({"email": "new@example.com"}),
            ))
            .with_body(r#"{"id":45,"email":"new@example.com"}"#)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let planned = member_state("new@example.com");
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "laravelvapor_team_member".to_string(),
                    prior_state: member_state("old@example.com"),
                    planned_state: planned.clone(),
                    config: planned,
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        remove.assert_async().await;
        add.assert_async().await;
    }

    #[tokio::test]
    async fn failed_add_after_removal_drops_state() {
        let mut server = Server::new_async().await;
        let remove = server
            .mock("DELETE", "/api/teams/3/members")
            .with_status(204)
            .create_async()
            .await;
        let _add = server
            .mock("POST", "/api/teams/3/members")
            .with_status(422)
            .with_body(r#"{"message":"The email must be a valid email address."}"#)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let planned = member_state("not-an-email");
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "laravelvapor_team_member".to_string(),
                    prior_state: member_state("old@example.com"),
                    planned_state: planned.clone(),
                    config: planned,
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Unable to add team member");
        assert!(response.new_state.is_null());
        remove.assert_async().await;
    }

    #[tokio::test]
    async fn delete_surfaces_api_errors() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/teams/3/members")
            .with_status(403)
            .with_body(r#"{"message":"Forbidden"}"#)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "laravelvapor_team_member".to_string(),
                    prior_state: member_state("dev@example.com"),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].detail.contains("Forbidden"));
    }

    #[tokio::test]
    async fn create_without_provider_data_reports_not_configured() {
        let resource = TeamMemberResource::new();
        let state = member_state("dev@example.com");
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "laravelvapor_team_member".to_string(),
                    planned_state: state.clone(),
                    config: state,
                },
            )
            .await;

        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
    }
}
