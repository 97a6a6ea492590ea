//! Wire shapes of the SQL query API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status block of a query, found either at the top level of a response or
/// nested under `status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStatusBody {
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub completion_status: Option<String>,
    #[serde(default)]
    pub row_count: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl QueryStatusBody {
    /// `rowCount` arrives as a number or a numeric string.
    pub fn row_count(&self) -> Option<u64> {
        match self.row_count.as_ref()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn or(self, other: Self) -> Self {
        Self {
            query_id: self.query_id.or(other.query_id),
            completion_status: self.completion_status.or(other.completion_status),
            row_count: self.row_count.or(other.row_count),
            error_message: self.error_message.or(other.error_message),
        }
    }
}

/// Submit, status and rows responses share this envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    status: Option<QueryStatusBody>,
    #[serde(flatten)]
    top: QueryStatusBody,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl QueryResponse {
    /// Nested status wins over top-level fields.
    pub fn status(&self) -> QueryStatusBody {
        match &self.status {
            Some(nested) => nested.clone().or(self.top.clone()),
            None => self.top.clone(),
        }
    }
}

/// Body of a query submission.
#[derive(Debug, Serialize)]
pub struct SubmitQuery<'a> {
    pub sql: &'a str,
}
