//! Shared HTTP plumbing for remote adapters.

use crate::provider::ProviderError;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Send a request and decode a JSON body.
///
/// Non-success statuses become `Http` errors carrying the response body;
/// bodies that fail to decode become `Malformed`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    provider: &str,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!("{} API error ({}): {}", provider, status, body);
        return Err(ProviderError::http(status.as_u16(), body));
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ProviderError::malformed(format!("{} returned invalid JSON: {}", provider, e)))
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderErrorKind;
    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(endpoint("http://x/api/", "/search"), "http://x/api/search");
        assert_eq!(endpoint("http://x/api", "search"), "http://x/api/search");
    }

    #[tokio::test]
    async fn test_send_json_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"a": 1})))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let value: Value = send_json(client.get(format!("{}/ok", server.uri())), "test")
            .await
            .unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn test_send_json_maps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = send_json::<Value>(client.get(server.uri()), "test")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Http(503));
        assert_eq!(err.message, "down");
    }

    #[tokio::test]
    async fn test_send_json_maps_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = send_json::<Value>(client.get(server.uri()), "test")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Malformed);
    }

    #[tokio::test]
    async fn test_send_json_maps_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let request = client
            .get(server.uri())
            .timeout(std::time::Duration::from_millis(50));
        let err = send_json::<Value>(request, "test").await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_send_json_maps_connection_failure() {
        let client = reqwest::Client::new();
        let err = send_json::<Value>(client.get("http://127.0.0.1:9/unreachable"), "test")
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }
}
