//! DNS zone API

use super::common::{deserialize_vapor_bool_option, is_zero, null_as_default};
use super::providers::CloudProvider;
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub team_id: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cloud_provider_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nameservers: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_vapor_bool_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub ses_verified: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_vapor_bool_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub importing: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_vapor_bool_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub queued_for_deletion: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<CloudProvider>,
}

#[derive(Debug, Serialize)]
struct CreateZoneRequest<'a> {
    cloud_provider_id: i64,
    zone: &'a str,
}

impl Client {
    /// POST api/teams/{team}/zones
    pub async fn create_zone(
        &self,
        team_id: i64,
        cloud_provider_id: i64,
        zone: &str,
    ) -> Result<Zone, ApiError> {
        let request = CreateZoneRequest {
            cloud_provider_id,
            zone,
        };
        self.post(&format!("api/teams/{}/zones", team_id), &request)
            .await
    }

    /// GET api/zones/{zone}
    pub async fn get_zone(&self, zone_id: i64) -> Result<Zone, ApiError> {
        self.get(&format!("api/zones/{}", zone_id)).await
    }

    /// GET api/teams/{team}/zones
    pub async fn get_zones(&self, team_id: i64) -> Result<Vec<Zone>, ApiError> {
        self.get(&format!("api/teams/{}/zones", team_id)).await
    }

    /// DELETE api/zones/{zone}
    pub async fn remove_zone(&self, zone_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("api/zones/{}", zone_id)).await
    }
}
