//! Common utilities for MCP tools.

use std::future::Future;
use std::sync::OnceLock;
use std::time::Instant;

use regex::Regex;
use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::ApiRequest;
use crate::error::{DataCloudError, Result};
use crate::mcp::hub::Services;

/// Identifiers spliced into catalog SQL may not be one of these words.
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "DROP", "DELETE", "INSERT", "UPDATE", "TRUNCATE", "ALTER", "CREATE", "EXEC", "EXECUTE",
];

pub type ToolResult = std::result::Result<CallToolResult, McpError>;

/// Error result for tool failures
pub fn tool_error(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

/// Pretty-printed JSON success result.
pub fn json_result(value: &Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    CallToolResult::success(vec![Content::text(text)])
}

/// Structured failure payload for a core error.
pub fn error_result(err: &DataCloudError) -> CallToolResult {
    let payload = err.to_payload();
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult::error(vec![Content::text(text)])
}

/// Render a core result for the client.
pub fn respond(result: Result<Value>) -> ToolResult {
    Ok(match result {
        Ok(value) => json_result(&value),
        Err(e) => error_result(&e),
    })
}

/// Send one request with the services' dispatcher and render the outcome.
pub async fn forward(services: &Services, request: ApiRequest) -> ToolResult {
    respond(services.dispatcher.call(&request).await)
}

/// Run a tool body, logging its outcome and duration.
pub async fn traced<F>(tool: &str, call: F) -> ToolResult
where
    F: Future<Output = ToolResult>,
{
    let started = Instant::now();
    let result = call.await;
    let elapsed = started.elapsed();

    match &result {
        Ok(r) if !r.is_error.unwrap_or(false) => info!("Tool {} succeeded in {:?}", tool, elapsed),
        Ok(_) => warn!("Tool {} returned an error after {:?}", tool, elapsed),
        Err(e) => warn!("Tool {} failed after {:?}: {:?}", tool, elapsed, e),
    }
    result
}

/// Accept a JSON payload given either inline or as a string holding JSON.
pub fn parse_json_param(param: Value, name: &str) -> std::result::Result<Value, CallToolResult> {
    match param {
        Value::String(raw) => serde_json::from_str(&raw)
            .map_err(|e| tool_error(format!("Invalid JSON in {}: {}", name, e))),
        other => Ok(other),
    }
}

/// Rename `type` to `dataType` in field definitions when `dataType` is absent.
pub fn normalize_field_definitions(mut definition: Value) -> Value {
    if let Some(fields) = definition.get_mut("fields").and_then(Value::as_array_mut) {
        for field in fields.iter_mut().filter_map(Value::as_object_mut) {
            if !field.contains_key("dataType") {
                if let Some(data_type) = field.remove("type") {
                    field.insert("dataType".to_string(), data_type);
                }
            }
        }
    }
    definition
}

fn identifier_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_%]+$").ok())
        .as_ref()
}

/// Check a table name or LIKE pattern before it is spliced into SQL.
pub fn check_identifier(value: &str, what: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} must not be empty", what));
    }
    if value.contains("--") || value.contains(';') {
        return Err(format!("{} contains a forbidden sequence", what));
    }
    if !identifier_pattern().map_or(false, |p| p.is_match(value)) {
        return Err(format!(
            "{} may only contain letters, digits, '_' and '%': {}",
            what, value
        ));
    }
    let upper = value.to_ascii_uppercase();
    if FORBIDDEN_KEYWORDS.contains(&upper.as_str()) {
        return Err(format!("{} must not be an SQL keyword: {}", what, value));
    }
    Ok(())
}

/// Object with a `success` flag and a message, for local operations.
pub fn message_result(success: bool, message: impl Into<String>, extra: Value) -> CallToolResult {
    let mut body = json!({ "success": success, "message": message.into() });
    if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), extra) {
        target.extend(fields);
    }
    json_result(&body)
}
