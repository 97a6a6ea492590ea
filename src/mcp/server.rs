//! MCP server implementation.
//!
//! This module contains the DataCloudMcpServer struct and its tool routing.
//! Tool bodies live in [`super::tools`]; the methods here only pick the
//! services of the current org and log each call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use super::hub::SessionHub;
use super::tools::{self, traced};
use super::types::*;
use crate::mcp::tools::objects::{DATA_LAKE_OBJECTS, DATA_MODEL_OBJECTS};

/// Data Cloud MCP Server
#[derive(Clone)]
pub struct DataCloudMcpServer {
    hub: Arc<SessionHub>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DataCloudMcpServer {
    pub fn new(hub: Arc<SessionHub>) -> Self {
        Self {
            hub,
            tool_router: Self::tool_router(),
        }
    }

    pub fn hub(&self) -> &Arc<SessionHub> {
        &self.hub
    }

    // ----- orgs and session -----

    #[tool(description = "List all Salesforce orgs authenticated via the Salesforce CLI")]
    async fn list_orgs(&self, Parameters(args): Parameters<ListOrgsArgs>) -> Result<CallToolResult, McpError> {
        traced("list_orgs", tools::org::list_orgs(&self.hub, args)).await
    }

    #[tool(description = "Set the target org for all subsequent Data Cloud operations")]
    async fn set_target_org(
        &self,
        Parameters(args): Parameters<SetTargetOrgArgs>,
    ) -> Result<CallToolResult, McpError> {
        traced("set_target_org", tools::org::set_target_org(&self.hub, args)).await
    }

    #[tool(description = "Get the currently selected org")]
    async fn get_target_org(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        traced("get_target_org", tools::org::get_target_org(&self.hub)).await
    }

    #[tool(description = "Show the active credential mode and the state of the cached access token")]
    async fn get_session_info(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        traced("get_session_info", tools::org::get_session_info(&self.hub)).await
    }

    // ----- SQL -----

    #[tool(
        description = "Execute a Data Cloud SQL query and return all rows with column metadata. Always quote identifiers and use exact casing. Long queries are polled until done; the query is cancelled when timeout_seconds runs out or the request is cancelled."
    )]
    async fn query(
        &self,
        context: RequestContext<RoleServer>,
        Parameters(args): Parameters<QueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;

        let cancel = Arc::new(AtomicBool::new(false));
        let watcher = {
            let flag = cancel.clone();
            let ct = context.ct.clone();
            tokio::spawn(async move {
                ct.cancelled().await;
                flag.store(true, Ordering::SeqCst);
            })
        };

        let result = traced("query", tools::query::query(&services, args, Some(cancel))).await;
        watcher.abort();
        result
    }

    #[tool(description = "List available tables in Data Cloud")]
    async fn list_tables(&self, Parameters(args): Parameters<ListTablesArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_tables", tools::query::list_tables(&services, args)).await
    }

    #[tool(description = "Get column names for a table")]
    async fn describe_table(&self, Parameters(args): Parameters<TableArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("describe_table", tools::query::describe_table(&services, args)).await
    }

    #[tool(description = "Cancel a running SQL query")]
    async fn cancel_query(&self, Parameters(args): Parameters<QueryIdArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("cancel_query", tools::query::cancel_query(&services, args)).await
    }

    #[tool(description = "Get the current status of a SQL query without waiting")]
    async fn get_query_status(&self, Parameters(args): Parameters<QueryIdArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_query_status", tools::query::get_query_status(&services, args)).await
    }

    // ----- metadata -----

    #[tool(description = "Get rich metadata for Data Cloud entities: fields, types and relationships")]
    async fn get_metadata(&self, Parameters(args): Parameters<MetadataArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_metadata", tools::metadata::get_metadata(&services, args)).await
    }

    #[tool(description = "Get detailed table schema with field types and business types")]
    async fn describe_table_full(&self, Parameters(args): Parameters<TableArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("describe_table_full", tools::metadata::describe_table_full(&services, args)).await
    }

    #[tool(description = "Get relationships for an entity (useful for JOINs)")]
    async fn get_relationships(
        &self,
        Parameters(args): Parameters<EntityNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_relationships", tools::metadata::get_relationships(&services, args)).await
    }

    #[tool(description = "Get org API limits and current usage")]
    async fn get_limits(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_limits", tools::metadata::get_limits(&services)).await
    }

    #[tool(description = "List all data spaces")]
    async fn list_data_spaces(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_spaces", tools::metadata::list_data_spaces(&services)).await
    }

    #[tool(description = "Get details for a data space")]
    async fn get_data_space(&self, Parameters(args): Parameters<DataSpaceArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_space", tools::metadata::get_data_space(&services, args)).await
    }

    #[tool(description = "List the members of a data space")]
    async fn get_data_space_members(
        &self,
        Parameters(args): Parameters<DataSpaceArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_space_members", tools::metadata::get_data_space_members(&services, args)).await
    }

    #[tool(description = "Update a data space from a JSON object of changes")]
    async fn update_data_space(
        &self,
        Parameters(args): Parameters<DataSpaceUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_data_space", tools::metadata::update_data_space(&services, args)).await
    }

    #[tool(description = "Replace or change the members of a data space")]
    async fn update_data_space_members(
        &self,
        Parameters(args): Parameters<DataSpaceMembersUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_data_space_members", tools::metadata::update_data_space_members(&services, args)).await
    }

    #[tool(description = "Get one member object of a data space")]
    async fn get_data_space_member(
        &self,
        Parameters(args): Parameters<DataSpaceMemberArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_space_member", tools::metadata::get_data_space_member(&services, args)).await
    }

    // ----- data lake objects -----

    #[tool(description = "List all Data Lake Objects (raw ingested data)")]
    async fn list_data_lake_objects(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_lake_objects", tools::objects::list(&services, DATA_LAKE_OBJECTS)).await
    }

    #[tool(description = "Get details for a specific Data Lake Object")]
    async fn get_data_lake_object(
        &self,
        Parameters(args): Parameters<ObjectNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_lake_object", tools::objects::get(&services, DATA_LAKE_OBJECTS, args)).await
    }

    #[tool(
        description = "Create a new Data Lake Object. The definition is JSON with name, label, dataSpaceName, category and fields; use 'dataType' for field types."
    )]
    async fn create_data_lake_object(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_data_lake_object", tools::objects::create(&services, DATA_LAKE_OBJECTS, args)).await
    }

    #[tool(description = "Update a Data Lake Object")]
    async fn update_data_lake_object(
        &self,
        Parameters(args): Parameters<ObjectUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_data_lake_object", tools::objects::update(&services, DATA_LAKE_OBJECTS, args)).await
    }

    #[tool(description = "Delete a Data Lake Object permanently")]
    async fn delete_data_lake_object(
        &self,
        Parameters(args): Parameters<ObjectNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_data_lake_object", tools::objects::delete(&services, DATA_LAKE_OBJECTS, args)).await
    }

    // ----- data model objects -----

    #[tool(description = "List all Data Model Objects (canonical entities)")]
    async fn list_data_model_objects(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_model_objects", tools::objects::list(&services, DATA_MODEL_OBJECTS)).await
    }

    #[tool(description = "Get details for a specific Data Model Object")]
    async fn get_data_model_object(
        &self,
        Parameters(args): Parameters<ObjectNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_model_object", tools::objects::get(&services, DATA_MODEL_OBJECTS, args)).await
    }

    #[tool(
        description = "Create a new Data Model Object. The definition is JSON with name, label, dataSpaceName, category, type and fields; use 'dataType' for field types."
    )]
    async fn create_data_model_object(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_data_model_object", tools::objects::create(&services, DATA_MODEL_OBJECTS, args)).await
    }

    #[tool(description = "Update a Data Model Object")]
    async fn update_data_model_object(
        &self,
        Parameters(args): Parameters<ObjectUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_data_model_object", tools::objects::update(&services, DATA_MODEL_OBJECTS, args)).await
    }

    #[tool(description = "Delete a Data Model Object permanently")]
    async fn delete_data_model_object(
        &self,
        Parameters(args): Parameters<ObjectNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_data_model_object", tools::objects::delete(&services, DATA_MODEL_OBJECTS, args)).await
    }

    #[tool(description = "Get field mappings between Data Lake Objects and Data Model Objects")]
    async fn get_dmo_mappings(&self, Parameters(args): Parameters<MappingsArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_dmo_mappings", tools::objects::get_dmo_mappings(&services, args)).await
    }

    #[tool(description = "Create a field mapping for a Data Model Object")]
    async fn create_dmo_mapping(
        &self,
        Parameters(args): Parameters<CreateMappingArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_dmo_mapping", tools::objects::create_dmo_mapping(&services, args)).await
    }

    #[tool(description = "Delete a field mapping")]
    async fn delete_dmo_mapping(
        &self,
        Parameters(args): Parameters<MappingNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_dmo_mapping", tools::objects::delete_dmo_mapping(&services, args)).await
    }

    #[tool(description = "Get relationships defined on a Data Model Object")]
    async fn get_dmo_relationships(
        &self,
        Parameters(args): Parameters<ObjectNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_dmo_relationships", tools::objects::get_dmo_relationships(&services, args)).await
    }

    #[tool(description = "Create a relationship on a Data Model Object")]
    async fn create_dmo_relationship(
        &self,
        Parameters(args): Parameters<CreateRelationshipArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_dmo_relationship", tools::objects::create_dmo_relationship(&services, args)).await
    }

    #[tool(description = "Delete a Data Model Object relationship")]
    async fn delete_dmo_relationship(
        &self,
        Parameters(args): Parameters<RelationshipNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_dmo_relationship", tools::objects::delete_dmo_relationship(&services, args)).await
    }

    // ----- segments -----

    #[tool(description = "List all segments")]
    async fn list_segments(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_segments", tools::segments::list_segments(&services)).await
    }

    #[tool(description = "Get details for a segment")]
    async fn get_segment(&self, Parameters(args): Parameters<SegmentNameArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_segment", tools::segments::get_segment(&services, args)).await
    }

    #[tool(description = "Get the members of a segment, 100 at a time by default")]
    async fn get_segment_members(
        &self,
        Parameters(args): Parameters<SegmentMembersArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_segment_members", tools::segments::get_segment_members(&services, args)).await
    }

    #[tool(description = "Count the members of a segment")]
    async fn count_segment(&self, Parameters(args): Parameters<SegmentNameArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("count_segment", tools::segments::count_segment(&services, args)).await
    }

    #[tool(description = "Create a segment from a JSON definition")]
    async fn create_segment(&self, Parameters(args): Parameters<DefinitionArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_segment", tools::segments::create_segment(&services, args)).await
    }

    #[tool(description = "Update a segment")]
    async fn update_segment(
        &self,
        Parameters(args): Parameters<SegmentUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_segment", tools::segments::update_segment(&services, args)).await
    }

    #[tool(description = "Delete a segment")]
    async fn delete_segment(&self, Parameters(args): Parameters<SegmentNameArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_segment", tools::segments::delete_segment(&services, args)).await
    }

    #[tool(description = "Publish a segment")]
    async fn publish_segment(&self, Parameters(args): Parameters<SegmentNameArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("publish_segment", tools::segments::publish_segment(&services, args)).await
    }

    #[tool(description = "Deactivate a segment")]
    async fn deactivate_segment(
        &self,
        Parameters(args): Parameters<SegmentNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("deactivate_segment", tools::segments::deactivate_segment(&services, args)).await
    }

    // ----- activations -----

    #[tool(description = "List all activations")]
    async fn list_activations(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_activations", tools::activations::list_activations(&services)).await
    }

    #[tool(description = "Get details for an activation")]
    async fn get_activation(
        &self,
        Parameters(args): Parameters<ActivationIdArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_activation", tools::activations::get_activation(&services, args)).await
    }

    #[tool(description = "Create an activation from a JSON definition")]
    async fn create_activation(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_activation", tools::activations::create_activation(&services, args)).await
    }

    #[tool(description = "Replace an activation definition")]
    async fn update_activation(
        &self,
        Parameters(args): Parameters<ActivationUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_activation", tools::activations::update_activation(&services, args)).await
    }

    #[tool(description = "Delete an activation")]
    async fn delete_activation(
        &self,
        Parameters(args): Parameters<ActivationIdArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_activation", tools::activations::delete_activation(&services, args)).await
    }

    #[tool(description = "Get the audience records produced by an activation")]
    async fn get_audience_records(
        &self,
        Parameters(args): Parameters<AudienceRecordsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_audience_records", tools::activations::get_audience_records(&services, args)).await
    }

    #[tool(description = "List activation targets")]
    async fn list_activation_targets(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_activation_targets", tools::activations::list_activation_targets(&services)).await
    }

    #[tool(description = "Get details for an activation target")]
    async fn get_activation_target(
        &self,
        Parameters(args): Parameters<TargetIdArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_activation_target", tools::activations::get_activation_target(&services, args)).await
    }

    // ----- data streams, transforms, connections -----

    #[tool(description = "List all data ingestion streams")]
    async fn list_data_streams(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_streams", tools::pipelines::list_data_streams(&services)).await
    }

    #[tool(description = "Get details for a data stream")]
    async fn get_data_stream(&self, Parameters(args): Parameters<StreamNameArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_stream", tools::pipelines::get_data_stream(&services, args)).await
    }

    #[tool(description = "Run one or more data streams now")]
    async fn run_data_streams(&self, Parameters(args): Parameters<RunStreamsArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("run_data_streams", tools::pipelines::run_data_streams(&services, args)).await
    }

    #[tool(description = "Create a data stream from a JSON definition")]
    async fn create_data_stream(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_data_stream", tools::pipelines::create_data_stream(&services, args)).await
    }

    #[tool(description = "Update a data stream")]
    async fn update_data_stream(
        &self,
        Parameters(args): Parameters<StreamUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_data_stream", tools::pipelines::update_data_stream(&services, args)).await
    }

    #[tool(description = "Delete a data stream")]
    async fn delete_data_stream(
        &self,
        Parameters(args): Parameters<StreamNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_data_stream", tools::pipelines::delete_data_stream(&services, args)).await
    }

    #[tool(description = "List all data transforms")]
    async fn list_data_transforms(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_transforms", tools::pipelines::list_data_transforms(&services)).await
    }

    #[tool(description = "Get details for a data transform")]
    async fn get_data_transform(
        &self,
        Parameters(args): Parameters<TransformNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_transform", tools::pipelines::get_data_transform(&services, args)).await
    }

    #[tool(description = "Get the run history of a data transform")]
    async fn get_transform_run_history(
        &self,
        Parameters(args): Parameters<TransformNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_transform_run_history", tools::pipelines::get_transform_run_history(&services, args)).await
    }

    #[tool(description = "Run a data transform now")]
    async fn run_data_transform(
        &self,
        Parameters(args): Parameters<TransformNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("run_data_transform", tools::pipelines::run_data_transform(&services, args)).await
    }

    #[tool(description = "Cancel a running data transform")]
    async fn cancel_data_transform(
        &self,
        Parameters(args): Parameters<TransformNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("cancel_data_transform", tools::pipelines::cancel_data_transform(&services, args)).await
    }

    #[tool(description = "Retry a failed data transform")]
    async fn retry_data_transform(
        &self,
        Parameters(args): Parameters<TransformNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("retry_data_transform", tools::pipelines::retry_data_transform(&services, args)).await
    }

    #[tool(description = "Create a data transform from a JSON definition")]
    async fn create_data_transform(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_data_transform", tools::pipelines::create_data_transform(&services, args)).await
    }

    #[tool(description = "Replace a data transform definition")]
    async fn update_data_transform(
        &self,
        Parameters(args): Parameters<TransformUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_data_transform", tools::pipelines::update_data_transform(&services, args)).await
    }

    #[tool(description = "Delete a data transform")]
    async fn delete_data_transform(
        &self,
        Parameters(args): Parameters<TransformNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_data_transform", tools::pipelines::delete_data_transform(&services, args)).await
    }

    #[tool(description = "Get the schedule of a data transform")]
    async fn get_transform_schedule(
        &self,
        Parameters(args): Parameters<TransformNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_transform_schedule", tools::pipelines::get_transform_schedule(&services, args)).await
    }

    #[tool(description = "Set the schedule of a data transform")]
    async fn update_transform_schedule(
        &self,
        Parameters(args): Parameters<TransformScheduleArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "update_transform_schedule",
            tools::pipelines::update_transform_schedule(&services, args),
        )
        .await
    }

    #[tool(description = "Validate a data transform definition without saving it")]
    async fn validate_data_transform(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("validate_data_transform", tools::pipelines::validate_data_transform(&services, args)).await
    }

    #[tool(description = "List connections, optionally by connector type")]
    async fn list_connections(
        &self,
        Parameters(args): Parameters<ConnectionListArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_connections", tools::pipelines::list_connections(&services, args)).await
    }

    #[tool(description = "Get details for a connection")]
    async fn get_connection(
        &self,
        Parameters(args): Parameters<ConnectionNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_connection", tools::pipelines::get_connection(&services, args)).await
    }

    #[tool(description = "Create a connection from a JSON definition")]
    async fn create_connection(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_connection", tools::pipelines::create_connection(&services, args)).await
    }

    #[tool(description = "Update a connection from a JSON object of changes")]
    async fn update_connection(
        &self,
        Parameters(args): Parameters<ConnectionUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_connection", tools::pipelines::update_connection(&services, args)).await
    }

    #[tool(description = "Delete a connection")]
    async fn delete_connection(
        &self,
        Parameters(args): Parameters<ConnectionNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_connection", tools::pipelines::delete_connection(&services, args)).await
    }

    #[tool(description = "List the source objects available through a connection")]
    async fn get_connection_objects(
        &self,
        Parameters(args): Parameters<ConnectionNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_connection_objects", tools::pipelines::get_connection_objects(&services, args)).await
    }

    #[tool(description = "Preview rows of a source object through a connection")]
    async fn preview_connection(
        &self,
        Parameters(args): Parameters<ConnectionPreviewArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("preview_connection", tools::pipelines::preview_connection(&services, args)).await
    }

    #[tool(description = "Get the schema exposed by a connection")]
    async fn get_connection_schema(
        &self,
        Parameters(args): Parameters<ConnectionNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_connection_schema", tools::pipelines::get_connection_schema(&services, args)).await
    }

    #[tool(description = "List the endpoints of a connection")]
    async fn get_connection_endpoints(
        &self,
        Parameters(args): Parameters<ConnectionNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_connection_endpoints", tools::pipelines::get_connection_endpoints(&services, args)).await
    }

    #[tool(description = "List the databases reachable through a connection")]
    async fn get_connection_databases(
        &self,
        Parameters(args): Parameters<ConnectionNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_connection_databases", tools::pipelines::get_connection_databases(&services, args)).await
    }

    #[tool(description = "List database schemas reachable through a connection")]
    async fn get_connection_database_schemas(
        &self,
        Parameters(args): Parameters<DatabaseSchemasArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "get_connection_database_schemas",
            tools::pipelines::get_connection_database_schemas(&services, args),
        )
        .await
    }

    #[tool(description = "List available connectors")]
    async fn list_connectors(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_connectors", tools::pipelines::list_connectors(&services)).await
    }

    #[tool(description = "Get details for a connector type")]
    async fn get_connector(
        &self,
        Parameters(args): Parameters<ConnectorTypeArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_connector", tools::pipelines::get_connector(&services, args)).await
    }

    // ----- calculated insights -----

    #[tool(description = "List all calculated insights")]
    async fn list_calculated_insights(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_calculated_insights", tools::insights::list_calculated_insights(&services)).await
    }

    #[tool(description = "Get details for a calculated insight")]
    async fn get_calculated_insight(
        &self,
        Parameters(args): Parameters<InsightNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_calculated_insight", tools::insights::get_calculated_insight(&services, args)).await
    }

    #[tool(description = "Create a calculated insight from a JSON definition")]
    async fn create_calculated_insight(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_calculated_insight", tools::insights::create_calculated_insight(&services, args)).await
    }

    #[tool(description = "Update a calculated insight from a JSON object of changes")]
    async fn update_calculated_insight(
        &self,
        Parameters(args): Parameters<InsightUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_calculated_insight", tools::insights::update_calculated_insight(&services, args)).await
    }

    #[tool(description = "Delete a calculated insight")]
    async fn delete_calculated_insight(
        &self,
        Parameters(args): Parameters<InsightNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_calculated_insight", tools::insights::delete_calculated_insight(&services, args)).await
    }

    #[tool(description = "Run a calculated insight now")]
    async fn run_calculated_insight(
        &self,
        Parameters(args): Parameters<InsightNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("run_calculated_insight", tools::insights::run_calculated_insight(&services, args)).await
    }

    #[tool(description = "Query aggregated data from a calculated insight")]
    async fn query_calculated_insight(
        &self,
        Parameters(args): Parameters<InsightQueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("query_calculated_insight", tools::insights::query_calculated_insight(&services, args)).await
    }

    #[tool(description = "Get dimension and measure metadata for calculated insights")]
    async fn get_insight_metadata(
        &self,
        Parameters(args): Parameters<InsightMetadataArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_insight_metadata", tools::insights::get_insight_metadata(&services, args)).await
    }

    // ----- identity resolution -----

    #[tool(description = "List identity resolution rulesets")]
    async fn list_identity_rulesets(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_identity_rulesets", tools::identity::list_identity_rulesets(&services)).await
    }

    #[tool(description = "Get details for an identity resolution ruleset")]
    async fn get_identity_ruleset(
        &self,
        Parameters(args): Parameters<RulesetNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_identity_ruleset", tools::identity::get_identity_ruleset(&services, args)).await
    }

    #[tool(description = "Update an identity resolution ruleset from a JSON object of changes")]
    async fn update_identity_ruleset(
        &self,
        Parameters(args): Parameters<RulesetUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_identity_ruleset", tools::identity::update_identity_ruleset(&services, args)).await
    }

    #[tool(description = "Delete an identity resolution ruleset")]
    async fn delete_identity_ruleset(
        &self,
        Parameters(args): Parameters<RulesetNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_identity_ruleset", tools::identity::delete_identity_ruleset(&services, args)).await
    }

    #[tool(description = "Run identity resolution for a ruleset now")]
    async fn run_identity_resolution(
        &self,
        Parameters(args): Parameters<RulesetNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("run_identity_resolution", tools::identity::run_identity_resolution(&services, args)).await
    }

    #[tool(description = "Find the unified individual id for a source record")]
    async fn lookup_unified_id(
        &self,
        Parameters(args): Parameters<UnifiedIdLookupArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("lookup_unified_id", tools::identity::lookup_unified_id(&services, args)).await
    }

    // ----- unified profiles -----

    #[tool(description = "Get metadata of unified profile objects")]
    async fn get_profile_metadata(
        &self,
        Parameters(args): Parameters<ProfileMetadataArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_profile_metadata", tools::profile::get_profile_metadata(&services, args)).await
    }

    #[tool(description = "Query unified profile records, one record, or a record's child object")]
    async fn query_profile(
        &self,
        Parameters(args): Parameters<ProfileQueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("query_profile", tools::profile::query_profile(&services, args)).await
    }

    #[tool(description = "Get one unified profile record by id")]
    async fn get_profile_record(
        &self,
        Parameters(args): Parameters<ProfileRecordArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_profile_record", tools::profile::get_profile_record(&services, args)).await
    }

    #[tool(description = "Get a profile record's related child object records")]
    async fn get_profile_record_with_children(
        &self,
        Parameters(args): Parameters<ProfileChildrenArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "get_profile_record_with_children",
            tools::profile::get_profile_record_with_children(&services, args),
        )
        .await
    }

    #[tool(description = "Get calculated insight values for a profile record")]
    async fn get_profile_record_with_insights(
        &self,
        Parameters(args): Parameters<ProfileInsightArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "get_profile_record_with_insights",
            tools::profile::get_profile_record_with_insights(&services, args),
        )
        .await
    }

    // ----- data graphs -----

    #[tool(description = "List data graph definitions")]
    async fn list_data_graphs(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_graphs", tools::graphs::list_data_graphs(&services)).await
    }

    #[tool(description = "Get a data graph definition")]
    async fn get_data_graph(
        &self,
        Parameters(args): Parameters<GraphNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_graph", tools::graphs::get_data_graph(&services, args)).await
    }

    #[tool(description = "Get a data graph record by record id or by lookup keys")]
    async fn query_data_graph(
        &self,
        Parameters(args): Parameters<GraphQueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("query_data_graph", tools::graphs::query_data_graph(&services, args)).await
    }

    #[tool(description = "Create a data graph from a JSON definition")]
    async fn create_data_graph(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_data_graph", tools::graphs::create_data_graph(&services, args)).await
    }

    #[tool(description = "Delete a data graph")]
    async fn delete_data_graph(
        &self,
        Parameters(args): Parameters<GraphNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_data_graph", tools::graphs::delete_data_graph(&services, args)).await
    }

    #[tool(description = "Refresh the data of a data graph")]
    async fn refresh_data_graph(
        &self,
        Parameters(args): Parameters<GraphNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("refresh_data_graph", tools::graphs::refresh_data_graph(&services, args)).await
    }

    // ----- machine learning -----

    #[tool(description = "List configured machine learning models")]
    async fn list_ml_models(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_ml_models", tools::ml::list_ml_models(&services)).await
    }

    #[tool(description = "Get a configured machine learning model")]
    async fn get_ml_model(
        &self,
        Parameters(args): Parameters<ModelNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_ml_model", tools::ml::get_ml_model(&services, args)).await
    }

    #[tool(description = "Update a configured model from a JSON object of changes")]
    async fn update_ml_model(
        &self,
        Parameters(args): Parameters<ModelUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_ml_model", tools::ml::update_ml_model(&services, args)).await
    }

    #[tool(description = "Delete a configured machine learning model")]
    async fn delete_ml_model(
        &self,
        Parameters(args): Parameters<ModelNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_ml_model", tools::ml::delete_ml_model(&services, args)).await
    }

    #[tool(description = "Get predictions from a configured model")]
    async fn get_prediction(
        &self,
        Parameters(args): Parameters<PredictionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_prediction", tools::ml::get_prediction(&services, args)).await
    }

    #[tool(description = "List machine learning model artifacts")]
    async fn list_model_artifacts(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_model_artifacts", tools::ml::list_model_artifacts(&services)).await
    }

    #[tool(description = "Get a machine learning model artifact")]
    async fn get_model_artifact(
        &self,
        Parameters(args): Parameters<ArtifactNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_model_artifact", tools::ml::get_model_artifact(&services, args)).await
    }

    #[tool(description = "Update a model artifact from a JSON object of changes")]
    async fn update_model_artifact(
        &self,
        Parameters(args): Parameters<ArtifactUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_model_artifact", tools::ml::update_model_artifact(&services, args)).await
    }

    #[tool(description = "Delete a machine learning model artifact")]
    async fn delete_model_artifact(
        &self,
        Parameters(args): Parameters<ArtifactNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_model_artifact", tools::ml::delete_model_artifact(&services, args)).await
    }

    // ----- document AI and semantic search -----

    #[tool(description = "List Document AI configurations")]
    async fn list_document_ai_configs(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_document_ai_configs", tools::document_ai::list_document_ai_configs(&services)).await
    }

    #[tool(description = "Get a Document AI configuration")]
    async fn get_document_ai_config(
        &self,
        Parameters(args): Parameters<DocumentConfigArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_document_ai_config", tools::document_ai::get_document_ai_config(&services, args)).await
    }

    #[tool(description = "Create a Document AI configuration from a JSON definition")]
    async fn create_document_ai_config(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "create_document_ai_config",
            tools::document_ai::create_document_ai_config(&services, args),
        )
        .await
    }

    #[tool(description = "Update a Document AI configuration from a JSON object of changes")]
    async fn update_document_ai_config(
        &self,
        Parameters(args): Parameters<DocumentConfigUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "update_document_ai_config",
            tools::document_ai::update_document_ai_config(&services, args),
        )
        .await
    }

    #[tool(description = "Delete a Document AI configuration")]
    async fn delete_document_ai_config(
        &self,
        Parameters(args): Parameters<DocumentConfigArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "delete_document_ai_config",
            tools::document_ai::delete_document_ai_config(&services, args),
        )
        .await
    }

    #[tool(description = "Run a Document AI configuration")]
    async fn run_document_ai(
        &self,
        Parameters(args): Parameters<DocumentConfigArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("run_document_ai", tools::document_ai::run_document_ai(&services, args)).await
    }

    #[tool(description = "Extract structured data from a document")]
    async fn extract_document_data(
        &self,
        Parameters(args): Parameters<ExtractDocumentArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("extract_document_data", tools::document_ai::extract_document_data(&services, args)).await
    }

    #[tool(description = "Generate an extraction schema for a document")]
    async fn generate_document_schema(
        &self,
        Parameters(args): Parameters<SchemaRequestArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "generate_document_schema",
            tools::document_ai::generate_document_schema(&services, args),
        )
        .await
    }

    #[tool(description = "Get the global Document AI configuration")]
    async fn get_document_ai_global_config(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "get_document_ai_global_config",
            tools::document_ai::get_document_ai_global_config(&services),
        )
        .await
    }

    #[tool(description = "List semantic search indexes")]
    async fn list_semantic_searches(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_semantic_searches", tools::document_ai::list_semantic_searches(&services)).await
    }

    #[tool(description = "Get a semantic search index")]
    async fn get_semantic_search(
        &self,
        Parameters(args): Parameters<SearchNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_semantic_search", tools::document_ai::get_semantic_search(&services, args)).await
    }

    #[tool(description = "Create a semantic search index from a JSON definition")]
    async fn create_semantic_search(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_semantic_search", tools::document_ai::create_semantic_search(&services, args)).await
    }

    #[tool(description = "Update a semantic search index from a JSON object of changes")]
    async fn update_semantic_search(
        &self,
        Parameters(args): Parameters<SearchUpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("update_semantic_search", tools::document_ai::update_semantic_search(&services, args)).await
    }

    #[tool(description = "Delete a semantic search index")]
    async fn delete_semantic_search(
        &self,
        Parameters(args): Parameters<SearchNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_semantic_search", tools::document_ai::delete_semantic_search(&services, args)).await
    }

    #[tool(description = "Get the semantic search configuration")]
    async fn get_semantic_search_config(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_semantic_search_config", tools::document_ai::get_semantic_search_config(&services)).await
    }

    // ----- data actions -----

    #[tool(description = "List data actions")]
    async fn list_data_actions(&self, Parameters(_): Parameters<NoArgs>) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_actions", tools::actions::list_data_actions(&services)).await
    }

    #[tool(description = "Create a data action from a JSON definition")]
    async fn create_data_action(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_data_action", tools::actions::create_data_action(&services, args)).await
    }

    #[tool(description = "List data action targets")]
    async fn list_data_action_targets(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("list_data_action_targets", tools::actions::list_data_action_targets(&services)).await
    }

    #[tool(description = "Get a data action target")]
    async fn get_data_action_target(
        &self,
        Parameters(args): Parameters<ActionTargetArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("get_data_action_target", tools::actions::get_data_action_target(&services, args)).await
    }

    #[tool(description = "Create a data action target from a JSON definition")]
    async fn create_data_action_target(
        &self,
        Parameters(args): Parameters<DefinitionArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("create_data_action_target", tools::actions::create_data_action_target(&services, args)).await
    }

    #[tool(description = "Delete a data action target")]
    async fn delete_data_action_target(
        &self,
        Parameters(args): Parameters<ActionTargetArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_data_action_target", tools::actions::delete_data_action_target(&services, args)).await
    }

    #[tool(description = "Get the signing key of a webhook data action target")]
    async fn get_data_action_target_signing_key(
        &self,
        Parameters(args): Parameters<ActionTargetArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced(
            "get_data_action_target_signing_key",
            tools::actions::get_data_action_target_signing_key(&services, args),
        )
        .await
    }

    // ----- ingestion -----

    #[tool(description = "Stream records into an Ingestion API source object")]
    async fn ingest_records(
        &self,
        Parameters(args): Parameters<IngestRecordsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("ingest_records", tools::ingest::ingest_records(&services, args)).await
    }

    #[tool(description = "Delete records from an Ingestion API source object by primary key")]
    async fn delete_records(
        &self,
        Parameters(args): Parameters<DeleteRecordsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let services = self.hub.services().await;
        traced("delete_records", tools::ingest::delete_records(&services, args)).await
    }
}

#[tool_handler]
impl ServerHandler for DataCloudMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "datacloud-mcp".to_string(),
                title: Some("Salesforce Data Cloud".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Salesforce Data Cloud tools: run SQL, explore metadata, and manage segments, \
                 activations, data streams, transforms, connections, calculated insights, \
                 identity resolution, profiles, data graphs, ML models, Document AI, \
                 semantic search, data actions and ingestion. \
                 Use list_orgs and set_target_org to choose which org to work with."
                    .to_string(),
            ),
        }
    }
}
