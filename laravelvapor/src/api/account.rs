//! Account (current user) API

use super::common::{deserialize_vapor_bool_option, is_zero, null_as_default};
use super::teams::Team;
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_one: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(
        rename = "is_sandboxed",
        default,
        deserialize_with = "deserialize_vapor_bool_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sandboxed: Option<bool>,
}

impl Client {
    /// GET api/user
    pub async fn get_account(&self) -> Result<Account, ApiError> {
        self.get("api/user").await
    }
}
