//! Document AI and semantic search tools.

use serde_json::{json, Value};

use super::common::{forward, parse_json_param, tool_error, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{
    DefinitionArgs, DocumentConfigArgs, DocumentConfigUpdateArgs, ExtractDocumentArgs,
    SchemaRequestArgs, SearchNameArgs, SearchUpdateArgs,
};

fn config_path(services: &Services, id: &str, suffix: &str) -> String {
    services.connect(&format!(
        "/document-processing/configurations/{}{}",
        encode_segment(id),
        suffix
    ))
}

fn search_path(services: &Services, id: &str) -> String {
    services.connect(&format!("/search-index/{}", encode_segment(id)))
}

pub async fn list_document_ai_configs(services: &Services) -> ToolResult {
    let path = services.connect("/document-processing/configurations");
    forward(services, ApiRequest::get(path)).await
}

pub async fn get_document_ai_config(services: &Services, args: DocumentConfigArgs) -> ToolResult {
    forward(services, ApiRequest::get(config_path(services, &args.config_id, ""))).await
}

pub async fn create_document_ai_config(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = services.connect("/document-processing/configurations");
    forward(services, ApiRequest::post(path).json(definition)).await
}

pub async fn update_document_ai_config(
    services: &Services,
    args: DocumentConfigUpdateArgs,
) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = config_path(services, &args.config_id, "");
    forward(services, ApiRequest::patch(path).json(updates)).await
}

pub async fn delete_document_ai_config(services: &Services, args: DocumentConfigArgs) -> ToolResult {
    forward(services, ApiRequest::delete(config_path(services, &args.config_id, ""))).await
}

pub async fn run_document_ai(services: &Services, args: DocumentConfigArgs) -> ToolResult {
    let path = config_path(services, &args.config_id, "/actions/run");
    forward(services, ApiRequest::post(path)).await
}

/// Extract structured data from a document; document fields sit beside `configName`.
pub async fn extract_document_data(services: &Services, args: ExtractDocumentArgs) -> ToolResult {
    let fields = match parse_json_param(args.document_data, "document_data") {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => return Ok(tool_error("Error: document_data must be a JSON object")),
        Err(result) => return Ok(result),
    };
    let mut body = json!({ "configName": args.config_name });
    if let Some(target) = body.as_object_mut() {
        target.extend(fields);
    }

    let path = services.connect("/document-processing/actions/extract-data");
    forward(services, ApiRequest::post(path).json(body)).await
}

pub async fn generate_document_schema(services: &Services, args: SchemaRequestArgs) -> ToolResult {
    let request = match parse_json_param(args.request_data, "request_data") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = services.connect("/document-processing/actions/generate-schema");
    forward(services, ApiRequest::post(path).json(request)).await
}

pub async fn get_document_ai_global_config(services: &Services) -> ToolResult {
    let path = services.connect("/document-processing/global-config");
    forward(services, ApiRequest::get(path)).await
}

pub async fn list_semantic_searches(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/search-index"))).await
}

pub async fn get_semantic_search(services: &Services, args: SearchNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(search_path(services, &args.search_name))).await
}

pub async fn create_semantic_search(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/search-index")).json(definition)).await
}

pub async fn update_semantic_search(services: &Services, args: SearchUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::patch(search_path(services, &args.search_id)).json(updates)).await
}

pub async fn delete_semantic_search(services: &Services, args: SearchNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(search_path(services, &args.search_name))).await
}

pub async fn get_semantic_search_config(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/search-index/config"))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use crate::mcp::tools::common::tests::body_of;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_extract_merges_document_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/data/v63.0/ssot/document-processing/actions/extract-data"))
            .and(body_json(json!({
                "configName": "Invoices",
                "mimeType": "application/pdf",
                "files": [{ "data": "JVBERi0=" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "total": "12.00" }] })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = extract_document_data(
            &*hub.services().await,
            ExtractDocumentArgs {
                config_name: "Invoices".into(),
                document_data: json!({ "mimeType": "application/pdf", "files": [{ "data": "JVBERi0=" }] }),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["data"][0]["total"], "12.00");
    }

    #[tokio::test]
    async fn test_run_document_ai_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/data/v63.0/ssot/document-processing/configurations/cfg-7/actions/run"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = run_document_ai(
            &*hub.services().await,
            DocumentConfigArgs {
                config_id: "cfg-7".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_update_semantic_search_patches() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/services/data/v63.0/ssot/search-index/idx-1"))
            .and(body_json(json!({ "label": "Knowledge" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "idx-1" })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = update_semantic_search(
            &*hub.services().await,
            SearchUpdateArgs {
                search_id: "idx-1".into(),
                updates: json!({ "label": "Knowledge" }),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["id"], "idx-1");
    }
}
