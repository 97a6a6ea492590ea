//! MCP tool parameter types.
//!
//! These types are used with rmcp's `Parameters<T>` wrapper for automatic
//! deserialization and JSON schema generation. JSON payload parameters accept
//! either an object or a string holding JSON.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

/// Parameters for tools that take no arguments
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoArgs {}

// ---------------------------------------------------------------------------
// Orgs
// ---------------------------------------------------------------------------

/// Parameters for the list_orgs tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListOrgsArgs {
    /// Re-read the Salesforce CLI org list instead of using the cached one
    #[serde(default)]
    pub refresh: Option<bool>,
}

/// Parameters for the set_target_org tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetTargetOrgArgs {
    /// Org alias (e.g. 'my-dc-org') or username
    pub alias_or_username: String,
}

// ---------------------------------------------------------------------------
// SQL
// ---------------------------------------------------------------------------

/// Parameters for the query tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryArgs {
    /// Data Cloud SQL, sent as-is
    pub sql: String,
    /// Overall time budget in seconds; the query is cancelled when it runs out
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Parameters for the list_tables tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTablesArgs {
    /// LIKE pattern for table names, e.g. 'Individual%'. Defaults to the configured filter
    #[serde(default)]
    pub filter: Option<String>,
}

/// Parameters for tools that take a table name
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TableArgs {
    /// The table name, e.g. 'ssot__Individual__dlm'
    pub table: String,
}

/// Parameters for tools that take a query id
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryIdArgs {
    /// Query id returned when the query was submitted
    pub query_id: String,
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Parameters for the get_metadata tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MetadataArgs {
    /// Filter by entity name
    #[serde(default)]
    pub entity_name: Option<String>,
    /// Filter by entity type (e.g. 'DataLakeObject', 'DataModelObject')
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Filter by category (e.g. 'Profile', 'Engagement')
    #[serde(default)]
    pub entity_category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntityNameArgs {
    /// The entity name
    pub entity_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DataSpaceArgs {
    /// Data space name
    pub space_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DataSpaceUpdateArgs {
    /// Data space name
    pub space_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DataSpaceMembersUpdateArgs {
    /// Data space name
    pub space_name: String,
    /// JSON object describing the member changes
    pub members: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DataSpaceMemberArgs {
    /// Data space name
    pub space_name: String,
    /// Member object name
    pub member_name: String,
}

// ---------------------------------------------------------------------------
// Data lake and data model objects
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ObjectNameArgs {
    /// Object API name
    pub object_name: String,
}

/// Parameters for create tools that take a full definition
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DefinitionArgs {
    /// JSON definition, passed to the API as the request body
    pub definition: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ObjectUpdateArgs {
    /// Object API name
    pub object_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MappingsArgs {
    /// Data model object to list mappings for
    #[serde(default)]
    pub object_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateMappingArgs {
    /// JSON mapping definition
    pub mapping_definition: Value,
    /// Data space name
    #[serde(default)]
    pub dataspace: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MappingNameArgs {
    /// Name of the mapping
    pub mapping_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateRelationshipArgs {
    /// Data model object the relationship starts from
    pub object_name: String,
    /// JSON relationship definition
    pub relationship_definition: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RelationshipNameArgs {
    /// Name of the relationship
    pub relationship_name: String,
}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SegmentNameArgs {
    /// Segment API name
    pub segment_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SegmentMembersArgs {
    /// Segment API name
    pub segment_name: String,
    /// Maximum number of members to return (default 100)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of members to skip (default 0)
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SegmentUpdateArgs {
    /// Segment API name
    pub segment_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

// ---------------------------------------------------------------------------
// Activations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ActivationIdArgs {
    /// Activation id
    pub activation_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ActivationUpdateArgs {
    /// Activation id
    pub activation_id: String,
    /// Complete JSON activation definition that replaces the current one
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AudienceRecordsArgs {
    /// Activation id
    pub activation_id: String,
    /// Maximum number of records to return
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of records to skip
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProfileRecordArgs {
    /// Profile data model object
    pub dmo_name: String,
    /// Record id
    pub record_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProfileChildrenArgs {
    /// Parent data model object
    pub dmo_name: String,
    /// Parent record id
    pub record_id: String,
    /// Child data model object
    pub child_dmo_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProfileInsightArgs {
    /// Profile data model object
    pub dmo_name: String,
    /// Record id
    pub record_id: String,
    /// Calculated insight API name
    pub ci_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TargetIdArgs {
    /// Activation target id
    pub target_id: String,
}

// ---------------------------------------------------------------------------
// Data streams, transforms, connections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StreamNameArgs {
    /// Data stream name
    pub stream_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RunStreamsArgs {
    /// Data stream names to run
    pub stream_names: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StreamUpdateArgs {
    /// Data stream name
    pub stream_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TransformNameArgs {
    /// Data transform name
    pub transform_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TransformUpdateArgs {
    /// Data transform name
    pub transform_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TransformScheduleArgs {
    /// Data transform name
    pub transform_name: String,
    /// JSON schedule configuration
    pub schedule: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectionListArgs {
    /// Only list connections of this connector type
    #[serde(default)]
    pub connector_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectionNameArgs {
    /// Connection name or id
    pub connection_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectionUpdateArgs {
    /// Connection name or id
    pub connection_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectionPreviewArgs {
    /// Connection name or id
    pub connection_name: String,
    /// Source object to preview
    pub object_name: String,
    /// Maximum number of rows (default 10)
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DatabaseSchemasArgs {
    /// Connection name or id
    pub connection_name: String,
    /// Only list schemas of this database
    #[serde(default)]
    pub database: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectorTypeArgs {
    /// Connector type, as returned by list_connectors
    pub connector_type: String,
}

// ---------------------------------------------------------------------------
// Calculated insights
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InsightNameArgs {
    /// Calculated insight API name
    pub api_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InsightUpdateArgs {
    /// Calculated insight API name
    pub api_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InsightQueryArgs {
    /// Calculated insight API name
    pub api_name: String,
    /// Dimension fields to include
    #[serde(default)]
    pub dimensions: Vec<String>,
    /// Measure fields to include
    #[serde(default)]
    pub measures: Vec<String>,
    /// Filter conditions
    #[serde(default)]
    pub filters: Vec<String>,
    /// Order by clauses
    #[serde(default)]
    pub order_by: Vec<String>,
    /// Maximum number of rows
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InsightMetadataArgs {
    /// Calculated insight API name; all insights when omitted
    #[serde(default)]
    pub api_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Identity resolution and profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RulesetNameArgs {
    /// Identity resolution ruleset name
    pub ruleset_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RulesetUpdateArgs {
    /// Identity resolution ruleset name
    pub ruleset_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

/// Source record identifiers to resolve to a unified id
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UnifiedIdLookupArgs {
    pub entity_name: String,
    pub data_source_id: String,
    pub data_source_object_id: String,
    pub source_record_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProfileMetadataArgs {
    /// Profile data model object; all when omitted
    #[serde(default)]
    pub dmo_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProfileQueryArgs {
    /// Profile data model object, e.g. 'UnifiedIndividual__dlm'
    pub dmo_name: String,
    /// Record id to fetch
    #[serde(default)]
    pub record_id: Option<String>,
    /// Child data model object to fetch for the record
    #[serde(default)]
    pub child_dmo: Option<String>,
    /// Maximum number of records
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of records to skip
    #[serde(default)]
    pub offset: Option<u32>,
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IngestRecordsArgs {
    /// Ingestion API source name
    pub source_name: String,
    /// Object name within the source
    pub object_name: String,
    /// Records to ingest, as a JSON array of objects
    pub records: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteRecordsArgs {
    /// Ingestion API source name
    pub source_name: String,
    /// Object name within the source
    pub object_name: String,
    /// Primary key values of the records to delete
    pub record_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Data graphs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GraphNameArgs {
    /// Data graph name
    pub graph_name: String,
}

/// Look a graph record up by id or by lookup keys; one of the two is required
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GraphQueryArgs {
    /// Data graph entity name
    pub graph_name: String,
    /// Record id
    #[serde(default)]
    pub record_id: Option<String>,
    /// JSON object of lookup key fields and values
    #[serde(default)]
    pub lookup_keys: Option<Value>,
}

// ---------------------------------------------------------------------------
// Machine learning
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ModelNameArgs {
    /// Configured model name
    pub model_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ModelUpdateArgs {
    /// Configured model name
    pub model_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PredictionArgs {
    /// Configured model name or id
    pub model_name: String,
    /// JSON object merged into the prediction request
    #[serde(default)]
    pub input_data: Option<Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ArtifactNameArgs {
    /// Model artifact name
    pub artifact_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ArtifactUpdateArgs {
    /// Model artifact name
    pub artifact_name: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

// ---------------------------------------------------------------------------
// Document AI and semantic search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocumentConfigArgs {
    /// Document AI configuration id
    pub config_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocumentConfigUpdateArgs {
    /// Document AI configuration id
    pub config_id: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractDocumentArgs {
    /// Document AI configuration name
    pub config_name: String,
    /// JSON object with the document content and metadata
    pub document_data: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SchemaRequestArgs {
    /// JSON request for schema generation
    pub request_data: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchNameArgs {
    /// Semantic search index name or id
    pub search_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchUpdateArgs {
    /// Semantic search index id
    pub search_id: String,
    /// JSON object with the properties to update
    pub updates: Value,
}

// ---------------------------------------------------------------------------
// Data actions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ActionTargetArgs {
    /// Data action target API name
    pub api_name: String,
}
