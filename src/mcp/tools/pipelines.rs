//! Data stream, data transform and connection tools.

use serde_json::json;

use super::common::{forward, parse_json_param, tool_error, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{
    ConnectionListArgs, ConnectionNameArgs, ConnectionPreviewArgs, ConnectionUpdateArgs,
    ConnectorTypeArgs, DatabaseSchemasArgs, DefinitionArgs, RunStreamsArgs, StreamNameArgs,
    StreamUpdateArgs, TransformNameArgs, TransformScheduleArgs, TransformUpdateArgs,
};

const DEFAULT_PREVIEW_LIMIT: u32 = 10;

fn stream_path(services: &Services, name: &str) -> String {
    services.connect(&format!("/data-streams/{}", encode_segment(name)))
}

fn transform_path(services: &Services, name: &str, suffix: &str) -> String {
    services.connect(&format!("/data-transforms/{}{}", encode_segment(name), suffix))
}

fn connection_path(services: &Services, name: &str, suffix: &str) -> String {
    services.connect(&format!("/connections/{}{}", encode_segment(name), suffix))
}

pub async fn list_data_streams(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/data-streams"))).await
}

pub async fn get_data_stream(services: &Services, args: StreamNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(stream_path(services, &args.stream_name))).await
}

pub async fn run_data_streams(services: &Services, args: RunStreamsArgs) -> ToolResult {
    if args.stream_names.is_empty() {
        return Ok(tool_error("Error: stream_names must name at least one data stream"));
    }
    let request = ApiRequest::post(services.connect("/data-streams/actions/run"))
        .json(json!({ "dataStreamNames": args.stream_names }));
    forward(services, request).await
}

pub async fn create_data_stream(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/data-streams")).json(definition)).await
}

pub async fn update_data_stream(services: &Services, args: StreamUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::patch(stream_path(services, &args.stream_name)).json(updates)).await
}

pub async fn delete_data_stream(services: &Services, args: StreamNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(stream_path(services, &args.stream_name))).await
}

pub async fn list_data_transforms(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/data-transforms"))).await
}

pub async fn get_data_transform(services: &Services, args: TransformNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(transform_path(services, &args.transform_name, ""))).await
}

pub async fn get_transform_run_history(services: &Services, args: TransformNameArgs) -> ToolResult {
    let path = transform_path(services, &args.transform_name, "/run-history");
    forward(services, ApiRequest::get(path)).await
}

pub async fn run_data_transform(services: &Services, args: TransformNameArgs) -> ToolResult {
    let path = transform_path(services, &args.transform_name, "/actions/run");
    forward(services, ApiRequest::post(path).json(json!({}))).await
}

pub async fn cancel_data_transform(services: &Services, args: TransformNameArgs) -> ToolResult {
    let path = transform_path(services, &args.transform_name, "/actions/cancel");
    forward(services, ApiRequest::post(path)).await
}

pub async fn retry_data_transform(services: &Services, args: TransformNameArgs) -> ToolResult {
    let path = transform_path(services, &args.transform_name, "/actions/retry");
    forward(services, ApiRequest::post(path)).await
}

pub async fn create_data_transform(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/data-transforms")).json(definition)).await
}

/// Transforms are replaced wholesale, so this is a PUT.
pub async fn update_data_transform(services: &Services, args: TransformUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = transform_path(services, &args.transform_name, "");
    forward(services, ApiRequest::put(path).json(updates)).await
}

pub async fn delete_data_transform(services: &Services, args: TransformNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(transform_path(services, &args.transform_name, ""))).await
}

pub async fn get_transform_schedule(services: &Services, args: TransformNameArgs) -> ToolResult {
    let path = transform_path(services, &args.transform_name, "/schedule");
    forward(services, ApiRequest::get(path)).await
}

pub async fn update_transform_schedule(services: &Services, args: TransformScheduleArgs) -> ToolResult {
    let schedule = match parse_json_param(args.schedule, "schedule") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = transform_path(services, &args.transform_name, "/schedule");
    forward(services, ApiRequest::put(path).json(schedule)).await
}

pub async fn validate_data_transform(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let request = ApiRequest::post(services.connect("/data-transforms-validation")).json(definition);
    forward(services, request).await
}

pub async fn list_connections(services: &Services, args: ConnectionListArgs) -> ToolResult {
    let request =
        ApiRequest::get(services.connect("/connections")).query_opt("connectorType", args.connector_type);
    forward(services, request).await
}

pub async fn get_connection(services: &Services, args: ConnectionNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(connection_path(services, &args.connection_name, ""))).await
}

pub async fn create_connection(services: &Services, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::post(services.connect("/connections")).json(definition)).await
}

pub async fn update_connection(services: &Services, args: ConnectionUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = connection_path(services, &args.connection_name, "");
    forward(services, ApiRequest::patch(path).json(updates)).await
}

pub async fn delete_connection(services: &Services, args: ConnectionNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(connection_path(services, &args.connection_name, ""))).await
}

pub async fn get_connection_objects(services: &Services, args: ConnectionNameArgs) -> ToolResult {
    let path = connection_path(services, &args.connection_name, "/objects");
    forward(services, ApiRequest::post(path).json(json!({}))).await
}

pub async fn preview_connection(services: &Services, args: ConnectionPreviewArgs) -> ToolResult {
    let path = connection_path(services, &args.connection_name, "/preview");
    let body = json!({
        "objectName": args.object_name,
        "limit": args.limit.unwrap_or(DEFAULT_PREVIEW_LIMIT),
    });
    forward(services, ApiRequest::post(path).json(body)).await
}

pub async fn get_connection_schema(services: &Services, args: ConnectionNameArgs) -> ToolResult {
    let path = connection_path(services, &args.connection_name, "/schema");
    forward(services, ApiRequest::get(path)).await
}

pub async fn get_connection_endpoints(services: &Services, args: ConnectionNameArgs) -> ToolResult {
    let path = connection_path(services, &args.connection_name, "/endpoints");
    forward(services, ApiRequest::get(path)).await
}

pub async fn get_connection_databases(services: &Services, args: ConnectionNameArgs) -> ToolResult {
    let path = connection_path(services, &args.connection_name, "/databases");
    forward(services, ApiRequest::post(path).json(json!({}))).await
}

pub async fn get_connection_database_schemas(
    services: &Services,
    args: DatabaseSchemasArgs,
) -> ToolResult {
    let path = connection_path(services, &args.connection_name, "/database-schemas");
    let body = match args.database {
        Some(database) => json!({ "database": database }),
        None => json!({}),
    };
    forward(services, ApiRequest::post(path).json(body)).await
}

pub async fn list_connectors(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/connectors"))).await
}

pub async fn get_connector(services: &Services, args: ConnectorTypeArgs) -> ToolResult {
    let path = format!("/connectors/{}", encode_segment(&args.connector_type));
    forward(services, ApiRequest::get(services.connect(&path))).await
}
