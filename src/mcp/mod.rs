//! MCP (Model Context Protocol) server implementation using rmcp.
//!
//! The server exposes Salesforce Data Cloud operations as tools. Every tool
//! call resolves the services of the currently selected org through
//! [`SessionHub`] and returns either the JSON payload of the call or a
//! structured error payload.

mod handlers;
pub mod hub;
mod server;
mod tools;
pub mod types;

pub use handlers::run_mcp_server;
pub use hub::SessionHub;
