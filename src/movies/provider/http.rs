use crate::movies::{MovieError, Result};
use reqwest::{Client, StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Body fields upstreams use to explain a failure
const MESSAGE_FIELDS: [&str; 3] = ["status_message", "Error", "message"];

/// HTTP client wrapper for providers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_headers(base_url, timeout, HeaderMap::new())
    }

    /// Create a new HTTP client sending `headers` with every request
    pub fn with_headers(
        base_url: impl Into<String>,
        timeout: Duration,
        headers: HeaderMap,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Nextflix/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| MovieError::Config(format!("Failed to build HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Build full URL from endpoint
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Execute GET request with query parameters and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        Self::handle_response(response).await
    }

    /// Classify the response and parse JSON
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("Upstream request failed with status {status}"));

            if status == StatusCode::NOT_FOUND {
                return Err(MovieError::NotFound(message));
            }

            return Err(MovieError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;

        serde_json::from_slice(&body)
            .map_err(|e| MovieError::Parse(format!("Malformed upstream response: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> MovieError {
    if err.is_timeout() {
        MovieError::Unavailable {
            message: "Upstream request timed out".to_string(),
            timed_out: true,
        }
    } else {
        MovieError::Unavailable {
            message: format!("Upstream request failed: {err}"),
            timed_out: false,
        }
    }
}

fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    MESSAGE_FIELDS
        .iter()
        .find_map(|field| value.get(*field).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::new(server.uri(), Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn test_success_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/603"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 603})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let body: Value = client
            .get_json("/movie/603", &[("language", "en".to_string())])
            .await
            .unwrap();

        assert_eq!(body["id"], 603);
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_json::<Value>("/movie/1", &[]).await.unwrap_err();

        assert!(
            matches!(err, MovieError::NotFound(ref m) if m.contains("could not be found")),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_error_status_keeps_upstream_code_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status_message": "Invalid API key: You must be granted a valid key."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_json::<Value>("/movie/popular", &[]).await.unwrap_err();

        match err {
            MovieError::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_body_gets_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_json::<Value>("/genre/movie/list", &[]).await.unwrap_err();

        assert!(
            matches!(err, MovieError::Upstream { status: 503, ref message } if message.contains("503")),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_json::<Value>("/movie/popular", &[]).await.unwrap_err();

        assert!(matches!(err, MovieError::Parse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri(), Duration::from_millis(100)).unwrap();
        let err = client.get_json::<Value>("/movie/popular", &[]).await.unwrap_err();

        assert!(
            matches!(err, MovieError::Unavailable { timed_out: true, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client.get_json::<Value>("/movie/popular", &[]).await.unwrap_err();

        assert!(
            matches!(err, MovieError::Unavailable { timed_out: false, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = HttpClient::new("https://api.example.com/3/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/movie/603"), "https://api.example.com/3/movie/603");
    }
}
