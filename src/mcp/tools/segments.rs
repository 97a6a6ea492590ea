//! Segment tools.

use serde_json::json;

use super::common::{forward, parse_json_param, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{DefinitionArgs, SegmentMembersArgs, SegmentNameArgs, SegmentUpdateArgs};

const DEFAULT_MEMBER_LIMIT: u32 = 100;

fn segment_path(services: &Services, name: &str, suffix: &str) -> String {
    services.connect(&format!("/segments/{}{}", encode_segment(name), suffix))
}

pub async fn list_segments(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/segments"))).await
}

pub async fn get_segment(services: &Services, args: SegmentNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(segment_path(services, &args.segment_name, ""))).await
}

pub async fn get_segment_members(services: &Services, args: SegmentMembersArgs) -> ToolResult {
    let request = ApiRequest::get(segment_path(services, &args.segment_name, "/members"))
        .query("limit", args.limit.unwrap_or(DEFAULT_MEMBER_LIMIT))
        .query("offset", args.offset.unwrap_or(0));
    forward(services, request).await
}

pub async fn count_segment(services: &Services, args: SegmentNameArgs) -> ToolResult {
    let request =
        ApiRequest::post(segment_path(services, &args.segment_name, "/actions/count")).json(json!({}));
    forward(services, request).await
}

pub async fn create_segment(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/segments")).json(definition)).await
}

pub async fn update_segment(services: &Services, args: SegmentUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let request = ApiRequest::patch(segment_path(services, &args.segment_name, "")).json(updates);
    forward(services, request).await
}

pub async fn delete_segment(services: &Services, args: SegmentNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(segment_path(services, &args.segment_name, ""))).await
}

pub async fn publish_segment(services: &Services, args: SegmentNameArgs) -> ToolResult {
    let path = segment_path(services, &args.segment_name, "/actions/publish");
    forward(services, ApiRequest::post(path)).await
}

pub async fn deactivate_segment(services: &Services, args: SegmentNameArgs) -> ToolResult {
    let path = segment_path(services, &args.segment_name, "/actions/deactivate");
    forward(services, ApiRequest::post(path)).await
}
