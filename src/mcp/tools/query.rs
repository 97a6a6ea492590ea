//! SQL tools.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::common::{check_identifier, error_result, json_result, respond, tool_error, ToolResult};
use crate::api::QueryControl;
use crate::error::DataCloudError;
use crate::mcp::hub::Services;
use crate::mcp::types::{ListTablesArgs, QueryArgs, QueryIdArgs, TableArgs};

/// Run SQL to completion, honouring the caller's timeout and cancel flag.
pub async fn query(services: &Services, args: QueryArgs, cancel: Option<Arc<AtomicBool>>) -> ToolResult {
    if args.sql.trim().is_empty() {
        return Ok(tool_error("Error: SQL must not be empty"));
    }

    let control = QueryControl {
        timeout: args.timeout_seconds.map(Duration::from_secs),
        cancel,
    };
    respond(
        services
            .executor
            .execute(&args.sql, &control)
            .await
            .and_then(|result| {
                serde_json::to_value(result)
                    .map_err(|e| DataCloudError::Query(format!("Failed to encode result: {}", e)))
            }),
    )
}

pub async fn list_tables(services: &Services, args: ListTablesArgs) -> ToolResult {
    let filter = args.filter.unwrap_or_else(|| services.table_filter.clone());
    if let Err(message) = check_identifier(&filter, "Table filter") {
        return Ok(tool_error(message));
    }

    let sql = format!(
        "SELECT c.relname AS TABLE_NAME \
         FROM pg_catalog.pg_namespace n, pg_catalog.pg_class c \
         LEFT JOIN pg_catalog.pg_description d ON (c.oid = d.objoid AND d.objsubid = 0 AND d.classoid = 'pg_class'::regclass) \
         WHERE c.relnamespace = n.oid AND c.relname LIKE '{}'",
        filter
    );
    first_column_of(services, &sql).await
}

/// Column names of one table.
pub async fn describe_table(services: &Services, args: TableArgs) -> ToolResult {
    if let Err(message) = check_identifier(&args.table, "Table") {
        return Ok(tool_error(message));
    }

    let sql = format!(
        "SELECT a.attname FROM pg_catalog.pg_namespace n \
         JOIN pg_catalog.pg_class c ON (c.relnamespace = n.oid) \
         JOIN pg_catalog.pg_attribute a ON (a.attrelid = c.oid) \
         WHERE a.attnum > 0 AND NOT a.attisdropped AND c.relname='{}'",
        args.table
    );
    first_column_of(services, &sql).await
}

pub async fn cancel_query(services: &Services, args: QueryIdArgs) -> ToolResult {
    respond(services.executor.cancel(&args.query_id).await)
}

pub async fn get_query_status(services: &Services, args: QueryIdArgs) -> ToolResult {
    respond(services.executor.status(&args.query_id).await)
}

async fn first_column_of(services: &Services, sql: &str) -> ToolResult {
    match services.executor.execute(sql, &QueryControl::default()).await {
        Ok(result) => {
            let values: Vec<Value> = result.data.into_iter().filter_map(first_column).collect();
            Ok(json_result(&Value::Array(values)))
        }
        Err(e) => Ok(error_result(&e)),
    }
}

/// Rows arrive as arrays or as objects keyed by column name.
fn first_column(row: Value) -> Option<Value> {
    match row {
        Value::Array(mut cells) => {
            if cells.is_empty() {
                None
            } else {
                Some(cells.swap_remove(0))
            }
        }
        Value::Object(map) => map.into_iter().next().map(|(_, v)| v),
        Value::Null => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use crate::mcp::tools::common::tests::body_of;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "/services/data/v63.0/ssot/query-sql";

    #[test]
    fn test_first_column() {
        assert_eq!(first_column(json!(["a", "b"])), Some(json!("a")));
        assert_eq!(first_column(json!({ "TABLE_NAME": "t" })), Some(json!("t")));
        assert_eq!(first_column(json!([])), None);
    }

    #[tokio::test]
    async fn test_list_tables_returns_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .and(body_string_contains("LIKE 'Individual%'"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": { "queryId": "q1", "completionStatus": "Finished", "rowCount": 2 },
                "data": [["ssot__Individual__dlm"], ["Individual_Home__dll"]],
                "metadata": { "TABLE_NAME": { "type": "VARCHAR" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());
        let services = hub.services().await;

        let result = list_tables(
            &services,
            ListTablesArgs {
                filter: Some("Individual%".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            body_of(&result),
            json!(["ssot__Individual__dlm", "Individual_Home__dll"])
        );
    }

    #[tokio::test]
    async fn test_describe_table_rejects_injection_without_network() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());
        let services = hub.services().await;

        let result = describe_table(
            &services,
            TableArgs {
                table: "t'; DROP TABLE x; --".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_query_is_structured_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!([{
                "errorCode": "SQL_SYNTAX_ERROR",
                "message": "line 1:8: mismatched input"
            }])))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());
        let services = hub.services().await;

        let result = query(
            &services,
            QueryArgs {
                sql: "SELEC 1".into(),
                timeout_seconds: Some(5),
            },
            None,
        )
        .await
        .unwrap();

        let payload = body_of(&result);
        assert_eq!(result.is_error, Some(true));
        assert_eq!(payload["error"]["kind"], "api_error");
        assert_eq!(payload["error"]["details"][0]["errorCode"], "SQL_SYNTAX_ERROR");
    }
}
