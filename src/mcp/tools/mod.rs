//! MCP tool implementations.
//!
//! One module per Data Cloud area. Every tool takes the services of the
//! current org and returns a rendered `CallToolResult`; failures from the
//! core become structured error payloads, never protocol errors.

pub mod actions;
pub mod activations;
pub mod common;
pub mod document_ai;
pub mod graphs;
pub mod identity;
pub mod ingest;
pub mod insights;
pub mod metadata;
pub mod ml;
pub mod objects;
pub mod org;
pub mod pipelines;
pub mod profile;
pub mod query;
pub mod segments;

pub use common::{traced, ToolResult};
