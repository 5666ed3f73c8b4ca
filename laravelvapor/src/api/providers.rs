//! Cloud provider (linked AWS account) API

use super::common::{deserialize_vapor_bool_option, is_zero};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudProvider {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub team_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_vapor_bool_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub role_sync: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_limit: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_vapor_bool_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub queued_for_deletion: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sns_topic_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deleted_rest_api_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unreserved_concurrency: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ProviderMeta<'a> {
    key: &'a str,
    secret: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateProviderRequest<'a> {
    #[serde(rename = "type")]
    provider_type: &'a str,
    name: &'a str,
    meta: ProviderMeta<'a>,
}

impl Client {
    /// POST api/teams/{team}/providers
    ///
    /// The access key pair is only sent here; the API never returns it.
    pub async fn create_provider(
        &self,
        team_id: i64,
        provider: &CloudProvider,
        key: &str,
        secret: &str,
    ) -> Result<CloudProvider, ApiError> {
        let request = CreateProviderRequest {
            provider_type: provider.provider_type.as_deref().unwrap_or_default(),
            name: provider.name.as_deref().unwrap_or_default(),
            meta: ProviderMeta { key, secret },
        };
        self.post(&format!("api/teams/{}/providers", team_id), &request)
            .await
    }

    /// GET api/teams/{team}/providers
    pub async fn get_providers(&self, team_id: i64) -> Result<Vec<CloudProvider>, ApiError> {
        self.get(&format!("api/teams/{}/providers", team_id)).await
    }

    /// DELETE api/providers/{provider}
    pub async fn remove_provider(&self, provider_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("api/providers/{}", provider_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn create_provider_posts_type_name_and_credentials() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/teams/5/providers")
            .match_body(Matcher::Json(serde_json::json!({
                "type": "aws",
                "name": "production",
                "meta": {"key": "AKIA123", "secret": "shh"}
            })))
            .with_status(201)
            .with_body(
                r#"{"id":77,"team_id":5,"uuid":"abc","type":"aws","name":"production",
                    "network_limit":10,"queued_for_deletion":false}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let provider = CloudProvider {
            provider_type: Some("aws".to_string()),
            name: Some("production".to_string()),
            ..CloudProvider::default()
        };

        let created = client
            .create_provider(5, &provider, "AKIA123", "shh")
            .await
            .unwrap();

        assert_eq!(created.id, 77);
        assert_eq!(created.team_id, 5);
        assert_eq!(created.provider_type.as_deref(), Some("aws"));
        assert_eq!(created.network_limit, Some(10));
        assert_eq!(created.queued_for_deletion, Some(false));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_providers_lists_team_providers() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/5/providers")
            .with_body(r#"[{"id":1,"name":"a","queued_for_deletion":1},{"id":2,"name":"b"}]"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let providers = client.get_providers(5).await.unwrap();

        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].queued_for_deletion, Some(true));
        assert_eq!(providers[1].id, 2);
    }

    #[tokio::test]
    async fn get_providers_decodes_full_payload() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/5/providers")
            .with_body(
                r#"[{
                    "id": 77,
                    "team_id": 5,
                    "uuid": "9a1c6a7e-7d1f-4a55-bf0b-3c1c2ad6e1f0",
                    "type": "aws",
                    "name": "production",
                    "role_arn": "arn:aws:iam::123456789012:role/laravel-vapor-role",
                    "role_sync": true,
                    "sns_topic_arn": "arn:aws:sns:us-east-1:123456789012:vapor",
                    "network_limit": 10,
                    "last_deleted_rest_api_at": "2024-01-02 03:04:05",
                    "queued_for_deletion": false,
                    "concurrency": 1000,
                    "unreserved_concurrency": 900
                }]"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let providers = client.get_providers(5).await.unwrap();

        assert_eq!(
            providers,
            vec![CloudProvider {
                id: 77,
                team_id: 5,
                uuid: Some("9a1c6a7e-7d1f-4a55-bf0b-3c1c2ad6e1f0".to_string()),
                provider_type: Some("aws".to_string()),
                name: Some("production".to_string()),
                role_arn: Some("arn:aws:iam::123456789012:role/laravel-vapor-role".to_string()),
                role_sync: Some(true),
                network_limit: Some(10),
                queued_for_deletion: Some(false),
                sns_topic_arn: Some("arn:aws:sns:us-east-1:123456789012:vapor".to_string()),
                last_deleted_rest_api_at: Some("2024-01-02 03:04:05".to_string()),
                concurrency: Some(1000),
                unreserved_concurrency: Some(900),
            }]
        );
    }

    #[tokio::test]
    async fn role_sync_accepts_integer_flag() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/5/providers")
            .with_body(r#"[{"id":1,"name":"a","role_sync":0},{"id":2,"role_sync":null}]"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let providers = client.get_providers(5).await.unwrap();

        assert_eq!(providers[0].role_sync, Some(false));
        assert_eq!(providers[1].role_sync, None);
    }

    #[tokio::test]
    async fn remove_provider_deletes_by_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/providers/77")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client.remove_provider(77).await.unwrap();
        mock.assert_async().await;
    }
}
