//! Data graph tools.

use serde_json::Value;

use super::common::{forward, parse_json_param, tool_error, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{DefinitionArgs, GraphNameArgs, GraphQueryArgs};

fn graph_path(services: &Services, name: &str, suffix: &str) -> String {
    services.connect(&format!("/data-graphs/{}{}", encode_segment(name), suffix))
}

pub async fn list_data_graphs(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/data-graphs/metadata"))).await
}

pub async fn get_data_graph(services: &Services, args: GraphNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(graph_path(services, &args.graph_name, ""))).await
}

/// One graph record, addressed by record id or, failing that, by lookup keys.
pub async fn query_data_graph(services: &Services, args: GraphQueryArgs) -> ToolResult {
    let base = format!("/data-graphs/data/{}", encode_segment(&args.graph_name));

    if let Some(record_id) = &args.record_id {
        let path = format!("{}/{}", base, encode_segment(record_id));
        return forward(services, ApiRequest::get(services.connect(&path))).await;
    }

    let Some(keys) = args.lookup_keys else {
        return Ok(tool_error("Error: provide either record_id or lookup_keys"));
    };
    let keys = match parse_json_param(keys, "lookup_keys") {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Ok(tool_error("Error: lookup_keys must be a JSON object")),
        Err(result) => return Ok(result),
    };

    let mut request = ApiRequest::get(services.connect(&base));
    for (key, value) in keys {
        request = match value {
            Value::String(s) => request.query(&key, s),
            other => request.query(&key, other),
        };
    }
    forward(services, request).await
}

pub async fn create_data_graph(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/data-graphs")).json(definition)).await
}

pub async fn delete_data_graph(services: &Services, args: GraphNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(graph_path(services, &args.graph_name, ""))).await
}

pub async fn refresh_data_graph(services: &Services, args: GraphNameArgs) -> ToolResult {
    let path = graph_path(services, &args.graph_name, "/actions/refresh");
    forward(services, ApiRequest::post(path)).await
}
