//! DNS zone record API

use super::common::is_zero;
use super::{ApiError, Client};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub zone_id: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ZoneRecord {
    fn records_path(&self) -> String {
        format!("api/zones/{}/records", self.zone_id)
    }
}

impl Client {
    /// POST api/zones/{zone}/records with the full record as the body
    pub async fn create_zone_record(&self, record: &ZoneRecord) -> Result<ZoneRecord, ApiError> {
        self.post(&record.records_path(), record).await
    }

    /// DELETE api/zones/{zone}/records?type=..&name=..&value=..
    pub async fn remove_zone_record(&self, record: &ZoneRecord) -> Result<(), ApiError> {
        let query = [
            ("type", record.record_type.as_deref().unwrap_or_default()),
            ("name", record.name.as_deref().unwrap_or_default()),
            ("value", record.value.as_deref().unwrap_or_default()),
        ];
        self.request_with_query(Method::DELETE, &record.records_path(), &query)
            .await
    }
}
