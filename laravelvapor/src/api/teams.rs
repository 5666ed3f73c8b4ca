//! Team and team membership API

use super::account::Account;
use super::common::is_zero;
use super::{ApiError, Client};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentry_organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentry_organization_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<Account>>,
}

/// Body for POST api/owned-teams. Only the name is sent; the API rejects
/// an owner object, even an empty one.
#[derive(Debug, Serialize)]
struct CreateTeamRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct AddTeamMemberRequest<'a> {
    email: &'a str,
    permissions: &'a [String],
}

#[derive(Debug, Serialize)]
struct RemoveTeamMemberRequest<'a> {
    email: &'a str,
}

fn members_path(team_id: i64) -> String {
    format!("api/teams/{}/members", team_id)
}

impl Client {
    /// GET api/teams
    pub async fn get_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.get("api/teams").await
    }

    /// POST api/owned-teams
    pub async fn create_team(&self, team: &Team) -> Result<Team, ApiError> {
        let request = CreateTeamRequest {
            name: team.name.as_deref().unwrap_or_default(),
        };
        self.post("api/owned-teams", &request).await
    }

    /// GET api/teams/{team}/members
    pub async fn get_team_members(&self, team_id: i64) -> Result<Vec<Account>, ApiError> {
        self.get(&members_path(team_id)).await
    }

    /// POST api/teams/{team}/members
    pub async fn add_team_member(
        &self,
        team_id: i64,
        email: &str,
        permissions: &[String],
    ) -> Result<Account, ApiError> {
        let request = AddTeamMemberRequest { email, permissions };
        self.post(&members_path(team_id), &request).await
    }

    /// DELETE api/teams/{team}/members with the email in the body
    pub async fn remove_team_member(&self, team_id: i64, email: &str) -> Result<(), ApiError> {
        let request = RemoveTeamMemberRequest { email };
        self.request(Method::DELETE, &members_path(team_id), Some(&request))
            .await
    }
}
