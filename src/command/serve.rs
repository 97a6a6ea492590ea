use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::mcp::{self, SessionHub};

pub async fn run_serve(hub: Arc<SessionHub>) -> Result<()> {
    let services = hub.services().await;
    match services.org_alias() {
        Some(alias) => info!("Target org: {}", alias),
        None if hub.config().auth.client_id.is_some() => info!("Using connected app credentials"),
        None => info!("No target org selected; use set_target_org or DC_DEFAULT_ORG"),
    }
    drop(services);

    mcp::run_mcp_server(hub).await
}
