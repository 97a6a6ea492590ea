//! Metadata, limits and data space tools.

use serde_json::{json, Value};

use super::common::{error_result, forward, json_result, parse_json_param, tool_error, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::error::Result;
use crate::mcp::hub::Services;
use crate::mcp::types::{
    DataSpaceArgs, DataSpaceMemberArgs, DataSpaceMembersUpdateArgs, DataSpaceUpdateArgs,
    EntityNameArgs, MetadataArgs, TableArgs,
};

fn metadata_request(services: &Services, args: MetadataArgs) -> ApiRequest {
    ApiRequest::get(services.connect("/metadata"))
        .query_opt("entityName", args.entity_name)
        .query_opt("entityType", args.entity_type)
        .query_opt("entityCategory", args.entity_category)
}

pub async fn get_metadata(services: &Services, args: MetadataArgs) -> ToolResult {
    forward(services, metadata_request(services, args)).await
}

/// First metadata entry for `entity_name`, if any.
async fn entity_metadata(services: &Services, entity_name: &str) -> Result<Option<Value>> {
    let args = MetadataArgs {
        entity_name: Some(entity_name.to_string()),
        entity_type: None,
        entity_category: None,
    };
    let mut body = services.dispatcher.call(&metadata_request(services, args)).await?;
    Ok(body
        .get_mut("metadata")
        .and_then(Value::as_array_mut)
        .filter(|entries| !entries.is_empty())
        .map(|entries| entries.swap_remove(0)))
}

/// Field names, types and business types of one table.
pub async fn describe_table_full(services: &Services, args: TableArgs) -> ToolResult {
    let entity = match entity_metadata(services, &args.table).await {
        Ok(Some(entity)) => entity,
        Ok(None) => return Ok(tool_error(format!("No metadata found for table: {}", args.table))),
        Err(e) => return Ok(error_result(&e)),
    };

    let fields: Vec<Value> = entity
        .get("fields")
        .and_then(Value::as_array)
        .map(|fields| {
            fields
                .iter()
                .map(|f| {
                    json!({
                        "name": f.get("name"),
                        "displayName": f.get("displayName"),
                        "type": f.get("type"),
                        "businessType": f.get("businessType"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(json_result(&json!({
        "name": entity.get("name"),
        "displayName": entity.get("displayName"),
        "category": entity.get("category"),
        "fields": fields,
        "primaryKeys": entity.get("primaryKeys").cloned().unwrap_or_else(|| json!([])),
    })))
}

/// Relationships of an entity, for writing joins.
pub async fn get_relationships(services: &Services, args: EntityNameArgs) -> ToolResult {
    match entity_metadata(services, &args.entity_name).await {
        Ok(entity) => {
            let relationships = entity
                .and_then(|mut e| e.get_mut("relationships").map(Value::take))
                .unwrap_or_else(|| json!([]));
            Ok(json_result(&relationships))
        }
        Err(e) => Ok(error_result(&e)),
    }
}

/// Org limits live outside the Connect API prefix.
pub async fn get_limits(services: &Services) -> ToolResult {
    let path = format!("/services/data/{}/limits", services.api_version);
    forward(services, ApiRequest::get(path)).await
}

fn space_path(services: &Services, name: &str, suffix: &str) -> String {
    services.connect(&format!("/data-spaces/{}{}", encode_segment(name), suffix))
}

pub async fn list_data_spaces(services: &Services) -> ToolResult {
    forward(services, ApiRequest::get(services.connect("/data-spaces"))).await
}

pub async fn get_data_space(services: &Services, args: DataSpaceArgs) -> ToolResult {
    forward(services, ApiRequest::get(space_path(services, &args.space_name, ""))).await
}

pub async fn update_data_space(services: &Services, args: DataSpaceUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = space_path(services, &args.space_name, "");
    forward(services, ApiRequest::patch(path).json(updates)).await
}

pub async fn get_data_space_members(services: &Services, args: DataSpaceArgs) -> ToolResult {
    forward(services, ApiRequest::get(space_path(services, &args.space_name, "/members"))).await
}

pub async fn update_data_space_members(
    services: &Services,
    args: DataSpaceMembersUpdateArgs,
) -> ToolResult {
    let members = match parse_json_param(args.members, "members") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = space_path(services, &args.space_name, "/members");
    forward(services, ApiRequest::put(path).json(members)).await
}

pub async fn get_data_space_member(services: &Services, args: DataSpaceMemberArgs) -> ToolResult {
    let suffix = format!("/members/{}", encode_segment(&args.member_name));
    forward(services, ApiRequest::get(space_path(services, &args.space_name, &suffix))).await
}
