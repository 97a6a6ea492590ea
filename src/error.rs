//! Error taxonomy shared by the auth, dispatch and query layers.
//!
//! Every failure that can reach a tool call is one of these variants. The
//! tool surface renders them with [`DataCloudError::to_payload`] so the calling
//! assistant always receives a structured failure instead of a backtrace.

use serde_json::{json, Value};
use thiserror::Error;

/// Errors raised by the Data Cloud core.
#[derive(Debug, Error)]
pub enum DataCloudError {
    /// Missing or ambiguous credential selection. Only the operator can fix it.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token acquisition or exchange failed.
    #[error("authentication failed: {message}")]
    Auth {
        message: String,
        /// Provider error body, when the failure came from an HTTP response.
        details: Option<Value>,
    },

    /// The service could not be reached at all.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service was reached and rejected the request.
    #[error("API request failed with status {status}")]
    Api { status: u16, body: Value },

    /// A query finished in a failed state or produced a malformed result.
    #[error("query failed: {0}")]
    Query(String),

    /// The caller aborted a long-running operation.
    #[error("operation cancelled: {0}")]
    Cancelled(String),
}

pub type Result<T> = std::result::Result<T, DataCloudError>;

impl DataCloudError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            details: None,
        }
    }

    pub fn auth_with_details(message: impl Into<String>, details: Value) -> Self {
        Self::Auth {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Auth { .. } => "auth_error",
            Self::Transport(_) => "transport_error",
            Self::Api { .. } => "api_error",
            Self::Query(_) => "query_error",
            Self::Cancelled(_) => "cancelled",
        }
    }

    /// Whether simply calling again has a reasonable chance of succeeding.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Auth { details, .. } => details.is_none(),
            Self::Configuration(_) | Self::Query(_) | Self::Cancelled(_) => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured failure payload handed back to the MCP client.
    pub fn to_payload(&self) -> Value {
        let mut error = json!({
            "kind": self.kind(),
            "message": self.to_string(),
            "retryable": self.retryable(),
        });

        match self {
            Self::Api { status, body } => {
                error["status"] = json!(status);
                error["details"] = body.clone();
            }
            Self::Auth {
                details: Some(details),
                ..
            } => {
                error["details"] = details.clone();
            }
            _ => {}
        }

        json!({ "error": error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_payload_keeps_provider_body() {
        let body = json!([{ "errorCode": "NOT_FOUND", "message": "segment missing" }]);
        let err = DataCloudError::Api {
            status: 404,
            body: body.clone(),
        };

        let payload = err.to_payload();
        assert_eq!(payload["error"]["kind"], "api_error");
        assert_eq!(payload["error"]["status"], 404);
        assert_eq!(payload["error"]["details"], body);
        assert_eq!(payload["error"]["retryable"], false);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            DataCloudError::config("x"),
            DataCloudError::auth("x"),
            DataCloudError::Transport("x".into()),
            DataCloudError::Api {
                status: 500,
                body: Value::Null,
            },
            DataCloudError::Query("x".into()),
            DataCloudError::Cancelled("x".into()),
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_retryable_hints() {
        assert!(DataCloudError::Transport("refused".into()).retryable());
        assert!(DataCloudError::Api {
            status: 503,
            body: Value::Null
        }
        .retryable());
        assert!(!DataCloudError::Api {
            status: 400,
            body: Value::Null
        }
        .retryable());
        assert!(!DataCloudError::config("missing").retryable());
        assert!(!DataCloudError::auth_with_details("bad", json!({"error": "invalid_grant"})).retryable());
    }
}
