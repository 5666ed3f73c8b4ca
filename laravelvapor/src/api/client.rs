use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use super::error::ApiError;

/// Production Vapor API host, used when the provider sets no `host`
pub const DEFAULT_API_HOST: &str = "https://vapor.laravel.com";

/// Laravel Vapor API client
///
/// Cheap to clone; the host and token are fixed at construction and shared
/// read-only by every resource and data source.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: String,
}

impl Client {
    /// Create a client for `host` (the production host when `None` or empty)
    pub fn new(host: Option<&str>, api_token: &str) -> Result<Self, ApiError> {
        let host = host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_API_HOST);

        let base_url =
            Url::parse(host).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", host, e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: expected an http(s) base URL",
                host
            )));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                "terraform-provider-laravelvapor/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                api_token: api_token.to_string(),
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Joins `path` onto the base URL's path segments
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Execute a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    /// Performs one HTTP exchange and decodes the response into `T`
    pub async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url_for(path);
        self.execute(method, url, body).await
    }

    /// Like [`Client::request`] with URL-encoded query parameters appended
    pub async fn request_with_query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.url_for(path);
        url.query_pairs_mut().extend_pairs(query);
        self.execute::<T, ()>(method, url, None).await
    }

    async fn execute<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        tracing::debug!("{} request to: {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.inner.api_token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(ApiError::Encode)?;
            request = request.body(encoded);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        let bytes = response.bytes().await?;

        if status.as_u16() > 299 {
            let (message, envelope_error) = match serde_json::from_slice::<ErrorEnvelope>(&bytes)
            {
                Ok(envelope) => (envelope.message, None),
                Err(e) => (String::new(), Some(e)),
            };
            tracing::error!("API error response {}: {}", status, message);

            return Err(ApiError::Status {
                status: status.as_u16(),
                method: method.to_string(),
                url: url.to_string(),
                message,
                envelope_error,
            });
        }

        // Bodiless responses decode as null so `()` and Option targets accept them
        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };

        serde_json::from_slice(payload).map_err(|e| {
            tracing::error!("Failed to deserialize response from {}: {}", url, e);
            ApiError::Decode {
                url: url.to_string(),
                source: e,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::error::Error as _;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: i64,
        #[serde(default)]
        name: Option<String>,
    }

    #[tokio::test]
    async fn every_method_sends_auth_and_json_headers() {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for method in ["GET", "POST", "DELETE"] {
            mocks.push(
                server
                    .mock(method, "/api/things")
                    .match_header("authorization", "Bearer secret-token")
                    .match_header("accept", "application/json")
                    .match_header("content-type", "application/json")
                    .with_body(r#"{"id":1}"#)
                    .create_async()
                    .await,
            );
        }

        let client = Client::new(Some(&server.url()), "secret-token").unwrap();

        assert_ok!(client.get::<Thing>("api/things").await);
        assert_ok!(
            client
                .post::<Thing, _>("api/things", &serde_json::json!({"name": "x"}))
                .await
        );
        assert_ok!(client.delete::<Thing>("api/things").await);

        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn success_body_decodes_into_target() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/things/3")
            .with_body(r#"{"id":3,"name":"three","extra":true}"#)
            .create_async()
            .await;

        let client = Client::new(Some(&server.url()), "token").unwrap();

        let thing: Thing = client.get("api/things/3").await.unwrap();
        assert_eq!(
            thing,
            Thing {
                id: 3,
                name: Some("three".to_string())
            }
        );
    }

    #[tokio::test]
    async fn error_status_carries_envelope_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/things")
            .with_status(422)
            .with_body(r#"{"message":"The name has already been taken."}"#)
            .create_async()
            .await;

        let client = Client::new(Some(&server.url()), "token").unwrap();

        let err = client
            .post::<Thing, _>("api/things", &serde_json::json!({}))
            .await
            .unwrap_err();

        let text = err.to_string();
        assert!(text.starts_with("422 POST request to "));
        assert!(text.contains("/api/things"));
        assert!(text.ends_with("failed with message: The name has already been taken."));
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn unparseable_error_body_leaves_message_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/user")
            .with_status(500)
            .with_body("<html>Server Error</html>")
            .create_async()
            .await;

        let client = Client::new(Some(&server.url()), "token").unwrap();

        let err = client.get::<Thing>("api/user").await.unwrap_err();
        match &err {
            ApiError::Status {
                status,
                method,
                message,
                envelope_error,
                ..
            } => {
                assert_eq!(*status, 500);
                assert_eq!(method, "GET");
                assert!(message.is_empty());
                assert!(envelope_error.is_some());
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
        assert!(err.to_string().ends_with("failed with message: "));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn not_found_is_detected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/zones/9")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create_async()
            .await;

        let client = Client::new(Some(&server.url()), "token").unwrap();

        let err = client.get::<Thing>("api/zones/9").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/user")
            .with_body(r#"{"id":"not-a-number"}"#)
            .create_async()
            .await;

        let client = Client::new(Some(&server.url()), "token").unwrap();

        let result = client.get::<Thing>("api/user").await;
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[tokio::test]
    async fn empty_success_body_decodes_as_unit() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/providers/4")
            .with_status(204)
            .create_async()
            .await;

        let client = Client::new(Some(&server.url()), "token").unwrap();

        assert_ok!(client.delete::<()>("api/providers/4").await);
    }

    #[tokio::test]
    async fn query_parameters_are_url_encoded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/zones/1/records")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("type".into(), "TXT".into()),
                Matcher::UrlEncoded("value".into(), "v=spf1 include:x ~all".into()),
            ]))
            .create_async()
            .await;

        let client = Client::new(Some(&server.url()), "token").unwrap();

        let _ = client
            .request_with_query::<()>(
                Method::DELETE,
                "api/zones/1/records",
                &[("type", "TXT"), ("value", "v=spf1 include:x ~all")],
            )
            .await;
        mock.assert_async().await;
    }

    #[test]
    fn paths_join_onto_base_path() {
        let client = Client::new(Some("https://vapor.test/base/"), "token").unwrap();
        assert_eq!(
            client.url_for("api/user").as_str(),
            "https://vapor.test/base/api/user"
        );

        let client = Client::new(Some("https://vapor.test"), "token").unwrap();
        assert_eq!(
            client.url_for("/api/teams/5/members").as_str(),
            "https://vapor.test/api/teams/5/members"
        );
    }

    #[test]
    fn missing_or_blank_host_uses_default() {
        let client = Client::new(None, "token").unwrap();
        assert_eq!(client.base_url().as_str(), "https://vapor.laravel.com/");

        let client = Client::new(Some("  "), "token").unwrap();
        assert_eq!(client.base_url().as_str(), "https://vapor.laravel.com/");
    }

    #[test]
    fn invalid_host_is_rejected() {
        assert!(matches!(
            Client::new(Some("not a url"), "token"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::new(Some("mailto:ops@example.com"), "token"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn client_handles_network_errors() {
        let client = Client::new(Some("http://127.0.0.1:1"), "token").unwrap();

        let result = client.get::<Thing>("api/user").await;
        assert!(matches!(assert_err!(result), ApiError::Request(_)));
    }
}
