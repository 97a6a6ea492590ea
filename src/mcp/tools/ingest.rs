//! Streaming ingestion tools. These paths are served by the tenant host.

use serde_json::{json, Value};

use super::common::{forward, parse_json_param, tool_error, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{DeleteRecordsArgs, IngestRecordsArgs};

fn ingest_path(source: &str, object: &str) -> String {
    format!(
        "/api/v1/ingest/sources/{}/{}",
        encode_segment(source),
        encode_segment(object)
    )
}

pub async fn ingest_records(services: &Services, args: IngestRecordsArgs) -> ToolResult {
    let records = match parse_json_param(args.records, "records") {
        Ok(Value::Array(records)) if !records.is_empty() => records,
        Ok(_) => return Ok(tool_error("Error: records must be a non-empty JSON array")),
        Err(result) => return Ok(result),
    };
    let request = ApiRequest::post(ingest_path(&args.source_name, &args.object_name))
        .json(json!({ "data": records }));
    forward(services, request).await
}

pub async fn delete_records(services: &Services, args: DeleteRecordsArgs) -> ToolResult {
    if args.record_ids.is_empty() {
        return Ok(tool_error("Error: record_ids must contain at least one id"));
    }
    let request = ApiRequest::delete(ingest_path(&args.source_name, &args.object_name))
        .json(json!({ "ids": args.record_ids }));
    forward(services, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use crate::mcp::tools::common::tests::body_of;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ingest_goes_to_tenant_host_with_tenant_token() {
        let platform = MockServer::start().await;
        let tenant = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/a360/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tenant-token",
                "instance_url": tenant.uri()
            })))
            .expect(1)
            .mount(&platform)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/ingest/sources/web/events"))
            .and(header("authorization", "Bearer tenant-token"))
            .and(body_json(json!({ "data": [{ "id": "1" }, { "id": "2" }] })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "accepted": true })))
            .expect(2)
            .mount(&tenant)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &platform.uri());
        let services = hub.services().await;

        for _ in 0..2 {
            let result = ingest_records(
                &services,
                IngestRecordsArgs {
                    source_name: "web".into(),
                    object_name: "events".into(),
                    records: json!(r#"[{"id": "1"}, {"id": "2"}]"#),
                },
            )
            .await
            .unwrap();
            assert_eq!(body_of(&result), json!({ "accepted": true }));
        }
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_array() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = ingest_records(
            &*hub.services().await,
            IngestRecordsArgs {
                source_name: "web".into(),
                object_name: "events".into(),
                records: json!({ "id": "1" }),
            },
        )
        .await
        .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
