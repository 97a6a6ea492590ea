//! Activation and activation target tools.

use super::common::{forward, parse_json_param, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{ActivationIdArgs, ActivationUpdateArgs, AudienceRecordsArgs, DefinitionArgs, TargetIdArgs};

fn activation_path(services: &Services, id: &str) -> String {
    services.connect(&format!("/activations/{}", encode_segment(id)))
}

pub async fn list_activations(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/activations"))).await
}

pub async fn get_activation(services: &Services, args: ActivationIdArgs) -> ToolResult {
    forward(services, ApiRequest::get(activation_path(services, &args.activation_id))).await
}

pub async fn create_activation(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/activations")).json(definition)).await
}

/// Activations are replaced wholesale with PUT.
pub async fn update_activation(services: &Services, args: ActivationUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let request = ApiRequest::put(activation_path(services, &args.activation_id)).json(updates);
    forward(services, request).await
}

pub async fn delete_activation(services: &Services, args: ActivationIdArgs) -> ToolResult {
    forward(services, ApiRequest::delete(activation_path(services, &args.activation_id))).await
}

pub async fn get_audience_records(services: &Services, args: AudienceRecordsArgs) -> ToolResult {
    let path = format!("{}/audience-dmo-records", activation_path(services, &args.activation_id));
    let request = ApiRequest::get(path)
        .query_opt("limit", args.limit)
        .query_opt("offset", args.offset);
    forward(services, request).await
}

pub async fn list_activation_targets(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/activation-targets"))).await
}

pub async fn get_activation_target(services: &Services, args: TargetIdArgs) -> ToolResult {
    let path = format!("/activation-targets/{}", encode_segment(&args.target_id));
    forward(services, ApiRequest::get(services.connect(&path))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_update_uses_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/services/data/v63.0/ssot/activations/0XX1"))
            .and(body_json(json!({ "name": "Nightly" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = update_activation(
            &*hub.services().await,
            ActivationUpdateArgs {
                activation_id: "0XX1".into(),
                updates: json!({ "name": "Nightly" }),
            },
        )
        .await
        .unwrap();
        assert_eq!(result.is_error, Some(false));
    }
}
