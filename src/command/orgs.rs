use anyhow::{Context, Result};
use chrono::Utc;

use crate::mcp::SessionHub;

pub async fn run_orgs(hub: &SessionHub) -> Result<()> {
    let orgs = hub
        .sessions()
        .list_sessions(true)
        .await
        .context("Failed to list Salesforce CLI orgs")?;

    if orgs.is_empty() {
        println!("No orgs found. Run 'sf org login web' to add one.");
        return Ok(());
    }

    let now = Utc::now();
    for org in &orgs {
        let marker = if org.is_usable(now) { "✅" } else { "⚠️ " };
        println!(
            "{} {:<20} {:<40} {}",
            marker,
            org.alias.as_deref().unwrap_or("-"),
            org.username,
            org.instance_url
        );
    }

    Ok(())
}
