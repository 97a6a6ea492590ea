//! Delegated sessions read from the Salesforce CLI.
//!
//! Users authenticate orgs with `sf org login web --alias my-org`; this module
//! only reads the resulting sessions. It never drives the CLI's login flow.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::{DataCloudError, Result};

/// Timeout for a single `sf` invocation.
const SF_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// `connectedStatus` reported for a usable org.
const CONNECTED: &str = "Connected";

/// One authenticated org known to the external session store.
#[derive(Clone)]
pub struct ExternalSession {
    pub username: String,
    pub alias: Option<String>,
    pub instance_url: String,
    pub access_token: String,
    pub org_id: String,
    pub org_name: String,
    pub is_sandbox: bool,
    pub is_scratch: bool,
    pub connected_status: String,
    /// The CLI reports no token expiry; this is the scratch org's `expirationDate` when present.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ExternalSession {
    /// Alias when set, username otherwise.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.username)
    }

    pub fn matches(&self, alias_or_username: &str) -> bool {
        self.alias.as_deref() == Some(alias_or_username) || self.username == alias_or_username
    }

    /// Whether the store reports a token that can be used right now.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty()
            && self.connected_status == CONNECTED
            && self.expires_at.map_or(true, |exp| now < exp)
    }

    /// Representation safe to hand to a client: never includes the token.
    pub fn to_public_json(&self) -> Value {
        json!({
            "username": self.username,
            "alias": self.alias,
            "instance_url": self.instance_url,
            "org_id": self.org_id,
            "org_name": self.org_name,
            "is_sandbox": self.is_sandbox,
            "is_scratch": self.is_scratch,
            "connected_status": self.connected_status,
        })
    }
}

impl fmt::Debug for ExternalSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalSession")
            .field("username", &self.username)
            .field("alias", &self.alias)
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("connected_status", &self.connected_status)
            .finish()
    }
}

/// Read-only source of delegated sessions.
#[async_trait]
pub trait ExternalSessionSource: Send + Sync {
    /// List known sessions. `refresh` bypasses any cached listing.
    async fn list_sessions(&self, refresh: bool) -> Result<Vec<ExternalSession>>;

    /// Find one session by alias or username.
    async fn find_session(&self, alias_or_username: &str, refresh: bool) -> Result<Option<ExternalSession>> {
        let sessions = self.list_sessions(refresh).await?;
        Ok(sessions.into_iter().find(|s| s.matches(alias_or_username)))
    }
}

#[derive(Debug, Deserialize)]
struct OrgListOutput {
    #[serde(default)]
    result: OrgListResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgListResult {
    #[serde(default)]
    non_scratch_orgs: Vec<RawOrg>,
    #[serde(default)]
    scratch_orgs: Vec<RawOrg>,
    #[serde(default)]
    sandboxes: Vec<RawOrg>,
    #[serde(default)]
    other: Vec<RawOrg>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawOrg {
    username: String,
    alias: Option<String>,
    instance_url: String,
    access_token: String,
    org_id: String,
    name: String,
    is_sandbox: bool,
    is_scratch: bool,
    connected_status: Option<String>,
    expiration_date: Option<String>,
}

/// `expirationDate` is a plain date for scratch orgs; full timestamps are accepted too.
fn parse_expiration(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?))
}

impl From<RawOrg> for ExternalSession {
    fn from(raw: RawOrg) -> Self {
        Self {
            username: raw.username,
            alias: raw.alias.filter(|a| !a.is_empty()),
            instance_url: raw.instance_url,
            access_token: raw.access_token,
            org_id: raw.org_id,
            org_name: raw.name,
            is_sandbox: raw.is_sandbox,
            is_scratch: raw.is_scratch,
            connected_status: raw.connected_status.unwrap_or_else(|| "Unknown".to_string()),
            expires_at: raw.expiration_date.as_deref().and_then(parse_expiration),
        }
    }
}

/// Parse the JSON printed by `sf org list --json`.
fn parse_org_list(stdout: &str) -> Result<Vec<ExternalSession>> {
    let output: OrgListOutput = serde_json::from_str(stdout)
        .map_err(|e| DataCloudError::auth(format!("Failed to parse Salesforce CLI output: {}", e)))?;

    let r = output.result;
    let sessions: Vec<ExternalSession> = r
        .non_scratch_orgs
        .into_iter()
        .chain(r.scratch_orgs)
        .chain(r.sandboxes)
        .chain(r.other)
        .map(ExternalSession::from)
        .collect();

    Ok(sessions)
}

/// [`ExternalSessionSource`] backed by the `sf` executable.
pub struct SfCliSource {
    program: String,
    cache: Mutex<Option<Vec<ExternalSession>>>,
}

impl SfCliSource {
    pub fn new() -> Self {
        Self::with_program("sf")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cache: Mutex::new(None),
        }
    }

    async fn run_json(&self, args: &[&str]) -> Result<String> {
        debug!("Running Salesforce CLI: {} {} --json", self.program, args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(args).arg("--json").kill_on_drop(true);

        let output = match tokio::time::timeout(SF_COMMAND_TIMEOUT, command.output()).await {
            Err(_) => return Err(DataCloudError::auth("Salesforce CLI command timed out")),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataCloudError::config(
                    "Salesforce CLI not found. Install it with: npm install -g @salesforce/cli",
                ))
            }
            Ok(Err(e)) => {
                return Err(DataCloudError::auth(format!(
                    "Failed to run Salesforce CLI: {}",
                    e
                )))
            }
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
            error!("Salesforce CLI error: {}", message);
            return Err(DataCloudError::auth(format!(
                "Salesforce CLI command failed: {}",
                message
            )));
        }

        Ok(stdout)
    }
}

impl Default for SfCliSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExternalSessionSource for SfCliSource {
    async fn list_sessions(&self, refresh: bool) -> Result<Vec<ExternalSession>> {
        let mut cache = self.cache.lock().await;
        if let (Some(cached), false) = (cache.as_ref(), refresh) {
            return Ok(cached.clone());
        }

        let stdout = self.run_json(&["org", "list"]).await?;
        let sessions = parse_org_list(&stdout)?;
        info!("Found {} authenticated orgs", sessions.len());

        *cache = Some(sessions.clone());
        Ok(sessions)
    }
}
