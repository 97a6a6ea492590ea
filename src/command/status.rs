use anyhow::Result;
use chrono::Utc;

use crate::mcp::SessionHub;

pub async fn run_status(hub: &SessionHub) -> Result<()> {
    let services = hub.services().await;

    let creds = match services.session.credentials().await {
        Ok(creds) => creds,
        Err(e) => {
            println!("❌ No usable credentials: {}", e);
            println!("   Set SF_CLIENT_ID/SF_CLIENT_SECRET or DC_DEFAULT_ORG, or run 'sf org login web'.");
            return Ok(());
        }
    };

    println!("Credentials: {}", creds.describe());
    println!("API version: {}", services.api_version);
    println!("Token cache: {}", services.session.cache().path().display());

    let fingerprint = creds.fingerprint();
    match services.session.cache().peek() {
        Some(token) if token.is_valid_for(&fingerprint, Utc::now()) => {
            println!("✅ Cached token for {} valid until {}", token.instance_url, token.expires_at);
        }
        Some(token) if token.fingerprint != fingerprint.as_str() => {
            println!("⚠️  Cached token belongs to different credentials and will be replaced.");
        }
        Some(token) => {
            println!("⚠️  Cached token expired at {}", token.expires_at);
        }
        None => {
            println!("❌ No cached token");
            println!("   Run 'datacloud-mcp login' to authenticate.");
        }
    }

    Ok(())
}
