//! Data lake object and data model object tools.

use super::common::{forward, normalize_field_definitions, parse_json_param, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{
    CreateMappingArgs, CreateRelationshipArgs, DefinitionArgs, MappingNameArgs, MappingsArgs,
    ObjectNameArgs, ObjectUpdateArgs, RelationshipNameArgs,
};

/// Collection prefix for data lake objects.
pub const DATA_LAKE_OBJECTS: &str = "/data-lake-objects";
/// Collection prefix for data model objects.
pub const DATA_MODEL_OBJECTS: &str = "/data-model-objects";

fn item_path(services: &Services, collection: &str, name: &str) -> String {
    services.connect(&format!("{}/{}", collection, encode_segment(name)))
}

pub async fn list(services: &Services, collection: &str) -> ToolResult {
    forward(services, ApiRequest::get(services.connect(collection))).await
}

pub async fn get(services: &Services, collection: &str, args: ObjectNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(item_path(services, collection, &args.object_name))).await
}

/// Create an object; field `type` keys are renamed to `dataType`.
pub async fn create(services: &Services, collection: &str, args: DefinitionArgs) -> ToolResult {
    let definition = match parse_json_param(args.definition, "definition") {
        Ok(v) => normalize_field_definitions(v),
        Err(result) => return Ok(result),
    };
    forward(
        services,
        ApiRequest::post(services.connect(collection)).json(definition),
    )
    .await
}

pub async fn update(services: &Services, collection: &str, args: ObjectUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(
        services,
        ApiRequest::patch(item_path(services, collection, &args.object_name)).json(updates),
    )
    .await
}

pub async fn delete(services: &Services, collection: &str, args: ObjectNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(item_path(services, collection, &args.object_name))).await
}

pub async fn get_dmo_mappings(services: &Services, args: MappingsArgs) -> ToolResult {
    let path = match args.object_name {
        Some(name) => format!("{}/mappings", item_path(services, DATA_MODEL_OBJECTS, &name)),
        None => services.connect("/data-model-object-mappings"),
    };
    forward(services, ApiRequest::get(path)).await
}

pub async fn create_dmo_mapping(services: &Services, args: CreateMappingArgs) -> ToolResult {
    let definition = match parse_json_param(args.mapping_definition, "mapping_definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let request = ApiRequest::post(services.connect("/data-model-object-mappings"))
        .query("dataspace", args.dataspace.as_deref().unwrap_or("default"))
        .json(definition);
    forward(services, request).await
}

pub async fn delete_dmo_mapping(services: &Services, args: MappingNameArgs) -> ToolResult {
    let path = format!("/data-model-object-mappings/{}", encode_segment(&args.mapping_name));
    forward(services, ApiRequest::delete(services.connect(&path))).await
}

pub async fn get_dmo_relationships(services: &Services, args: ObjectNameArgs) -> ToolResult {
    let path = format!("{}/relationships", item_path(services, DATA_MODEL_OBJECTS, &args.object_name));
    forward(services, ApiRequest::get(path)).await
}

pub async fn create_dmo_relationship(services: &Services, args: CreateRelationshipArgs) -> ToolResult {
    let definition = match parse_json_param(args.relationship_definition, "relationship_definition") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = format!("{}/relationships", item_path(services, DATA_MODEL_OBJECTS, &args.object_name));
    forward(services, ApiRequest::post(path).json(definition)).await
}

pub async fn delete_dmo_relationship(services: &Services, args: RelationshipNameArgs) -> ToolResult {
    let path = format!(
        "{}/relationships/{}",
        DATA_MODEL_OBJECTS,
        encode_segment(&args.relationship_name)
    );
    forward(services, ApiRequest::delete(services.connect(&path))).await
}
