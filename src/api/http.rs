//! Shared HTTP transport.
//!
//! One `reqwest::Client` per process so connections are pooled across the
//! auth, dispatch and query layers. This layer never retries: the only
//! automatic retry lives in the dispatcher's 401 handling.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::{DataCloudError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn build_user_agent() -> String {
    std::env::var("DC_USER_AGENT")
        .unwrap_or_else(|_| format!("datacloud-mcp/{}", DEFAULT_VERSION))
}

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Process-wide HTTP client.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    session_id: String,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataCloudError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: build_user_agent(),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    /// Start a request carrying the standard headers.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("User-Agent", &self.user_agent)
            .header("x-request-id", Uuid::new_v4().to_string())
            .header("x-request-session-id", &self.session_id)
    }

    /// Send a request and read its body, whatever the status.
    ///
    /// Only failures to reach the service are errors here; status handling is
    /// left to the caller.
    pub async fn send(&self, request: RequestBuilder) -> Result<HttpResponse> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        debug!("HTTP response status {} ({} bytes)", status, text.len());

        Ok(HttpResponse {
            status,
            body: parse_body(status, &text),
        })
    }
}

fn transport_error(err: reqwest::Error) -> DataCloudError {
    let detail = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    DataCloudError::Transport(format!("{}: {}", detail, err))
}

/// Interpret a response body.
///
/// An empty successful body becomes `{"success": true}`; anything that is not
/// JSON is kept as a string so provider errors are never lost.
pub fn parse_body(status: StatusCode, text: &str) -> Value {
    if text.trim().is_empty() {
        return if status.is_success() {
            json!({ "success": true })
        } else {
            Value::Null
        };
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Join `path` onto `base`, keeping any path prefix `base` already has.
pub fn join_url(base: &Url, path: &str) -> Url {
    let mut joined = base.clone();
    let prefix = base.path().trim_end_matches('/');
    let suffix = path.trim_start_matches('/');
    joined.set_path(&format!("{}/{}", prefix, suffix));
    joined.set_query(None);
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(StatusCode::NO_CONTENT, ""), json!({ "success": true }));
        assert_eq!(parse_body(StatusCode::OK, " \n"), json!({ "success": true }));
        assert_eq!(parse_body(StatusCode::OK, "{\"a\":1}"), json!({ "a": 1 }));
        assert_eq!(
            parse_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            json!("<html>bad gateway</html>")
        );
        assert_eq!(parse_body(StatusCode::NOT_FOUND, ""), Value::Null);
    }

    #[test]
    fn test_join_url_keeps_base_path() {
        let base = Url::parse("https://example.my.salesforce.com").unwrap();
        assert_eq!(
            join_url(&base, "/services/data/v63.0/ssot/segments").as_str(),
            "https://example.my.salesforce.com/services/data/v63.0/ssot/segments"
        );

        let base = Url::parse("http://127.0.0.1:9999/mock/").unwrap();
        assert_eq!(
            join_url(&base, "services/a360/token").as_str(),
            "http://127.0.0.1:9999/mock/services/a360/token"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = HttpClient::with_timeout(Duration::from_secs(2)).unwrap();
        let url = Url::parse("http://127.0.0.1:1/unreachable").unwrap();
        let err = client.send(client.request(Method::GET, url)).await.unwrap_err();
        assert_eq!(err.kind(), "transport_error");
    }
}
