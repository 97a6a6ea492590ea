use anyhow::{Context, Result};

use crate::auth::PlatformTokenProvider;
use crate::mcp::SessionHub;

/// Acquire a platform token now so the server starts without a browser round trip.
pub async fn run_login(hub: &SessionHub) -> Result<()> {
    let services = hub.services().await;
    let creds = services
        .session
        .credentials()
        .await
        .context("No usable Salesforce credentials")?;

    println!("🔐 Logging in with {}...\n", creds.describe());

    let access = services
        .session
        .ensure_access()
        .await
        .context("Login failed")?;

    println!("✅ Logged in to {}", access.instance_url);
    println!("   Token cache: {}", services.session.cache().path().display());

    Ok(())
}
