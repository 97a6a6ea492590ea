//! MCP server handlers.
//!
//! This module contains only the MCP server startup logic.
//! Configuration and credential discovery happen in main.rs.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use super::hub::SessionHub;
use super::server::DataCloudMcpServer;

/// Run the MCP server over stdio until the client disconnects.
pub async fn run_mcp_server(hub: Arc<SessionHub>) -> Result<()> {
    info!("Starting Data Cloud MCP server");
    info!("Stdio mode (using rmcp)");

    let server = DataCloudMcpServer::new(hub);
    run_server(server).await
}

async fn run_server(server: DataCloudMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    let service = server.serve(stdio()).await.map_err(|e| {
        error!("Failed to start MCP service: {:?}", e);
        anyhow::anyhow!("Failed to start MCP service: {:?}", e)
    })?;
    info!("Ready for MCP client connections");

    service.waiting().await.map_err(|e| {
        error!("MCP service error: {:?}", e);
        anyhow::anyhow!("MCP service error: {:?}", e)
    })?;

    info!("MCP server shutting down");
    Ok(())
}
