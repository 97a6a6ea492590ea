//! Data action and data action target tools.

use super::common::{forward, parse_json_param, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{ActionTargetArgs, DefinitionArgs};

fn target_path(services: &Services, api_name: &str, suffix: &str) -> String {
    services.connect(&format!("/data-action-targets/{}{}", encode_segment(api_name), suffix))
}

pub async fn list_data_actions(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/data-actions"))).await
}

pub async fn create_data_action(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/data-actions")).json(definition)).await
}

pub async fn list_data_action_targets(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/data-action-targets"))).await
}

pub async fn get_data_action_target(services: &Services, args: ActionTargetArgs) -> ToolResult {
    forward(services, ApiRequest::get(target_path(services, &args.api_name, ""))).await
}

pub async fn create_data_action_target(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let request = ApiRequest::post(services.connect("/data-action-targets")).json(definition);
    forward(services, request).await
}

pub async fn delete_data_action_target(services: &Services, args: ActionTargetArgs) -> ToolResult {
    forward(services, ApiRequest::delete(target_path(services, &args.api_name, ""))).await
}

/// Signing key used to verify webhook payloads sent to the target.
pub async fn get_data_action_target_signing_key(
    services: &Services,
    args: ActionTargetArgs,
) -> ToolResult {
    let path = target_path(services, &args.api_name, "/signing-key");
    forward(services, ApiRequest::post(path)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use crate::mcp::tools::common::tests::body_of;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_data_action_posts_definition() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/data/v63.0/ssot/data-actions"))
            .and(body_json(json!({ "name": "HighValueOrder", "targetName": "OrdersHook" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "da-1" })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = create_data_action(
            &*hub.services().await,
            DefinitionArgs {
                definition: json!({ "name": "HighValueOrder", "targetName": "OrdersHook" }),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["id"], "da-1");
    }

    #[tokio::test]
    async fn test_signing_key_is_a_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/data/v63.0/ssot/data-action-targets/OrdersHook/signing-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "signingKey": "k" })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = get_data_action_target_signing_key(
            &*hub.services().await,
            ActionTargetArgs {
                api_name: "OrdersHook".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["signingKey"], "k");
    }
}
