//! Org selection and session information tools.

use chrono::Utc;
use serde_json::{json, Value};

use super::common::{error_result, json_result, message_result, ToolResult};
use crate::auth::Credentials;
use crate::mcp::hub::SessionHub;
use crate::mcp::types::{ListOrgsArgs, SetTargetOrgArgs};

/// List orgs known to the Salesforce CLI, without their tokens.
pub async fn list_orgs(hub: &SessionHub, args: ListOrgsArgs) -> ToolResult {
    let refresh = args.refresh.unwrap_or(true);
    match hub.sessions().list_sessions(refresh).await {
        Ok(orgs) => {
            let orgs: Vec<Value> = orgs.iter().map(|o| o.to_public_json()).collect();
            Ok(json_result(&Value::Array(orgs)))
        }
        Err(e) => Ok(error_result(&e)),
    }
}

pub async fn set_target_org(hub: &SessionHub, args: SetTargetOrgArgs) -> ToolResult {
    if let Err(e) = hub.set_target_org(&args.alias_or_username).await {
        return Ok(error_result(&e));
    }

    let org = hub
        .sessions()
        .find_session(&args.alias_or_username, false)
        .await
        .ok()
        .flatten();
    let name = org
        .as_ref()
        .map(|o| o.display_name().to_string())
        .unwrap_or_else(|| args.alias_or_username.clone());

    Ok(message_result(
        true,
        format!("Now connected to: {}", name),
        json!({ "org": org.map(|o| o.to_public_json()) }),
    ))
}

pub async fn get_target_org(hub: &SessionHub) -> ToolResult {
    let services = hub.services().await;
    let alias = match services.session.credentials().await {
        Ok(Credentials::Delegated(c)) => c.alias.clone(),
        Ok(Credentials::Interactive(c)) => {
            return Ok(json_result(&json!({
                "connected": true,
                "mode": "interactive",
                "login_url": c.login_url.as_str(),
            })))
        }
        Err(e) => {
            return Ok(json_result(&json!({
                "connected": false,
                "message": format!(
                    "{}. Use list_orgs and set_target_org to choose an org.",
                    e
                ),
            })))
        }
    };

    let org = match hub.sessions().find_session(&alias, false).await {
        Ok(org) => org,
        Err(e) => return Ok(error_result(&e)),
    };
    Ok(json_result(&json!({
        "connected": true,
        "mode": "delegated",
        "org": org.map(|o| o.to_public_json()),
    })))
}

/// Active credentials and the state of the cached token. Never includes a token.
pub async fn get_session_info(hub: &SessionHub) -> ToolResult {
    let services = hub.services().await;
    let creds = match services.session.credentials().await {
        Ok(creds) => creds,
        Err(e) => return Ok(error_result(&e)),
    };
    let fingerprint = creds.fingerprint();

    let cached = services.session.cache().peek().map(|token| {
        json!({
            "instance_url": token.instance_url,
            "expires_at": token.expires_at.to_rfc3339(),
            "fingerprint_matches": token.fingerprint == fingerprint.as_str(),
            "usable": token.is_valid_for(&fingerprint, Utc::now()),
        })
    });

    Ok(json_result(&json!({
        "mode": creds.mode(),
        "credentials": creds.describe(),
        "api_version": services.api_version,
        "token_cache": services.session.cache().path().display().to_string(),
        "cached_token": cached,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use crate::mcp::tools::common::tests::body_of as body;

    #[tokio::test]
    async fn test_list_orgs_hides_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), "https://dev.my.salesforce.com");

        let result = list_orgs(&hub, ListOrgsArgs { refresh: None }).await.unwrap();
        let orgs = body(&result);
        assert_eq!(orgs[0]["alias"], "dev");
        assert!(!orgs.to_string().contains("00D!dev"));
    }

    #[tokio::test]
    async fn test_target_org_reports_alias() {
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), "https://dev.my.salesforce.com");

        let info = body(&get_target_org(&hub).await.unwrap());
        assert_eq!(info["connected"], true);
        assert_eq!(info["org"]["alias"], "dev");
    }

    #[tokio::test]
    async fn test_set_unknown_org_is_error_result() {
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), "https://dev.my.salesforce.com");

        let result = set_target_org(
            &hub,
            SetTargetOrgArgs {
                alias_or_username: "nope".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(body(&result)["error"]["kind"], "configuration_error");
    }

    #[tokio::test]
    async fn test_session_info_after_token_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), "https://dev.my.salesforce.com");
        {
            use crate::auth::PlatformTokenProvider;
            hub.services().await.session.ensure_access().await.unwrap();
        }

        let info = body(&get_session_info(&hub).await.unwrap());
        assert_eq!(info["mode"], "delegated");
        assert_eq!(info["cached_token"]["usable"], true);
        assert!(!info.to_string().contains("00D!dev"));
    }
}
