//! Unified profile tools.

use super::common::{forward, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{
    ProfileChildrenArgs, ProfileInsightArgs, ProfileMetadataArgs, ProfileQueryArgs, ProfileRecordArgs,
};

fn record_path(services: &Services, dmo_name: &str, record_id: &str, suffix: &str) -> String {
    services.connect(&format!(
        "/profile/{}/{}{}",
        encode_segment(dmo_name),
        encode_segment(record_id),
        suffix
    ))
}

pub async fn get_profile_metadata(services: &Services, args: ProfileMetadataArgs) -> ToolResult {
    let path = match args.dmo_name {
        Some(name) => format!("/profile/metadata/{}", encode_segment(&name)),
        None => "/profile/metadata".to_string(),
    };
    forward(services, ApiRequest::get(services.connect(&path))).await
}

/// Records of a profile object, one record, or one record's child object.
pub async fn query_profile(services: &Services, args: ProfileQueryArgs) -> ToolResult {
    let mut path = format!("/profile/{}", encode_segment(&args.dmo_name));
    if let Some(record_id) = &args.record_id {
        path.push('/');
        path.push_str(&encode_segment(record_id));
        if let Some(child) = &args.child_dmo {
            path.push('/');
            path.push_str(&encode_segment(child));
        }
    }

    let request = ApiRequest::get(services.connect(&path))
        .query_opt("limit", args.limit)
        .query_opt("offset", args.offset);
    forward(services, request).await
}

pub async fn get_profile_record(services: &Services, args: ProfileRecordArgs) -> ToolResult {
    let path = record_path(services, &args.dmo_name, &args.record_id, "");
    forward(services, ApiRequest::get(path)).await
}

pub async fn get_profile_record_with_children(
    services: &Services,
    args: ProfileChildrenArgs,
) -> ToolResult {
    let suffix = format!("/{}", encode_segment(&args.child_dmo_name));
    let path = record_path(services, &args.dmo_name, &args.record_id, &suffix);
    forward(services, ApiRequest::get(path)).await
}

pub async fn get_profile_record_with_insights(
    services: &Services,
    args: ProfileInsightArgs,
) -> ToolResult {
    let suffix = format!("/calculated-insights/{}", encode_segment(&args.ci_name));
    let path = record_path(services, &args.dmo_name, &args.record_id, &suffix);
    forward(services, ApiRequest::get(path)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use crate::mcp::tools::common::tests::body_of;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_profile_child_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/services/data/v63.0/ssot/profile/UnifiedIndividual__dlm/abc/ContactPointEmail__dlm",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = query_profile(
            &*hub.services().await,
            ProfileQueryArgs {
                dmo_name: "UnifiedIndividual__dlm".into(),
                record_id: Some("abc".into()),
                child_dmo: Some("ContactPointEmail__dlm".into()),
                limit: None,
                offset: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_record_with_insights_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/services/data/v63.0/ssot/profile/UnifiedIndividual__dlm/abc/calculated-insights/Spend__cio",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "total": 42 }] })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = get_profile_record_with_insights(
            &*hub.services().await,
            ProfileInsightArgs {
                dmo_name: "UnifiedIndividual__dlm".into(),
                record_id: "abc".into(),
                ci_name: "Spend__cio".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["data"][0]["total"], 42);
    }
}
