//! Calculated insight tools.

use super::common::{forward, parse_json_param, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{
    DefinitionArgs, InsightMetadataArgs, InsightNameArgs, InsightQueryArgs, InsightUpdateArgs,
};

fn insight_path(services: &Services, name: &str, suffix: &str) -> String {
    services.connect(&format!("/calculated-insights/{}{}", encode_segment(name), suffix))
}

/// Comma-joined list parameter, skipped when empty.
fn joined(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

pub async fn list_calculated_insights(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/calculated-insights"))).await
}

pub async fn get_calculated_insight(services: &Services, args: InsightNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(insight_path(services, &args.api_name, ""))).await
}

pub async fn create_calculated_insight(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let request = ApiRequest::post(services.connect("/calculated-insights")).json(definition);
    forward(services, request).await
}

pub async fn update_calculated_insight(services: &Services, args: InsightUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = insight_path(services, &args.api_name, "");
    forward(services, ApiRequest::patch(path).json(updates)).await
}

pub async fn delete_calculated_insight(services: &Services, args: InsightNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(insight_path(services, &args.api_name, ""))).await
}

pub async fn run_calculated_insight(services: &Services, args: InsightNameArgs) -> ToolResult {
    let path = insight_path(services, &args.api_name, "/actions/run");
    forward(services, ApiRequest::post(path)).await
}

pub async fn query_calculated_insight(services: &Services, args: InsightQueryArgs) -> ToolResult {
    let path = services.connect(&format!(
        "/insight/calculated-insights/{}",
        encode_segment(&args.api_name)
    ));
    let request = ApiRequest::get(path)
        .query_opt("dimensions", joined(&args.dimensions))
        .query_opt("measures", joined(&args.measures))
        .query_opt("filters", joined(&args.filters))
        .query_opt("orderBy", joined(&args.order_by))
        .query_opt("limit", args.limit);
    forward(services, request).await
}

pub async fn get_insight_metadata(services: &Services, args: InsightMetadataArgs) -> ToolResult {
    let path = match args.api_name {
        Some(name) => format!("/insight/metadata/{}", encode_segment(&name)),
        None => "/insight/metadata".to_string(),
    };
    forward(services, ApiRequest::get(services.connect(&path))).await
}
