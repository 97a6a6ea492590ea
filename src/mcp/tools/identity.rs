//! Identity resolution tools.

use super::common::{forward, parse_json_param, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{RulesetNameArgs, RulesetUpdateArgs, UnifiedIdLookupArgs};

fn ruleset_path(services: &Services, name: &str, suffix: &str) -> String {
    services.connect(&format!("/identity-resolutions/{}{}", encode_segment(name), suffix))
}

pub async fn list_identity_rulesets(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/identity-resolutions"))).await
}

pub async fn get_identity_ruleset(services: &Services, args: RulesetNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(ruleset_path(services, &args.ruleset_name, ""))).await
}

pub async fn update_identity_ruleset(services: &Services, args: RulesetUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = ruleset_path(services, &args.ruleset_name, "");
    forward(services, ApiRequest::patch(path).json(updates)).await
}

pub async fn delete_identity_ruleset(services: &Services, args: RulesetNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(ruleset_path(services, &args.ruleset_name, ""))).await
}

pub async fn run_identity_resolution(services: &Services, args: RulesetNameArgs) -> ToolResult {
    let path = ruleset_path(services, &args.ruleset_name, "/actions/run");
    forward(services, ApiRequest::post(path)).await
}

/// Resolve a source record to its unified individual id.
pub async fn lookup_unified_id(services: &Services, args: UnifiedIdLookupArgs) -> ToolResult {
    let path = format!(
        "/universalIdLookup/{}/{}/{}/{}",
        encode_segment(&args.entity_name),
        encode_segment(&args.data_source_id),
        encode_segment(&args.data_source_object_id),
        encode_segment(&args.source_record_id),
    );
    forward(services, ApiRequest::get(services.connect(&path))).await
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
    async fn test_lookup_unified_id_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/services/data/v63.0/ssot/universalIdLookup/UnifiedIndividual__dlm/CRM/Contact__dll/003xx01",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unifiedId": "u-1" })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = lookup_unified_id(
            &*hub.services().await,
            UnifiedIdLookupArgs {
                entity_name: "UnifiedIndividual__dlm".into(),
                data_source_id: "CRM".into(),
                data_source_object_id: "Contact__dll".into(),
                source_record_id: "003xx01".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["unifiedId"], "u-1");
    }

    #[tokio::test]
    async fn test_update_ruleset_patches() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/services/data/v63.0/ssot/identity-resolutions/Default_IR"))
            .and(body_json(json!({ "description": "tightened" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = update_identity_ruleset(
            &*hub.services().await,
            RulesetUpdateArgs {
                ruleset_name: "Default_IR".into(),
                updates: json!(r#"{"description":"tightened"}"#),
            },
        )
        .await
        .unwrap();
        assert_eq!(result.is_error, Some(false));
    }
}
