//! Credential selection.
//!
//! Decides once, up front, whether the process logs in interactively with its
//! own connected app (OAuth + PKCE) or borrows a session from the Salesforce
//! CLI. Call sites only ever see the resulting [`Credentials`] variant.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::Url;

use super::sf_cli::ExternalSessionSource;
use crate::error::{DataCloudError, Result};

/// Raw credential settings as configured by the operator.
#[derive(Clone)]
pub struct AuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub login_url: String,
    pub callback_url: String,
    pub scopes: Vec<String>,
    pub org_alias: Option<String>,
    pub callback_timeout: Duration,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("login_url", &self.login_url)
            .field("callback_url", &self.callback_url)
            .field("scopes", &self.scopes)
            .field("org_alias", &self.org_alias)
            .field("callback_timeout", &self.callback_timeout)
            .finish()
    }
}

/// Identifies the credential configuration a cached token was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    fn derive(material: &str) -> Self {
        let digest = Sha256::digest(material.as_bytes());
        Self(URL_SAFE_NO_PAD.encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connected-app credentials for the browser-based PKCE login.
#[derive(Clone)]
pub struct InteractiveCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL of the login host, always with a scheme.
    pub login_url: Url,
    pub redirect_uri: Url,
    pub scopes: Vec<String>,
}

impl fmt::Debug for InteractiveCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("login_url", &self.login_url.as_str())
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// A session borrowed from the Salesforce CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedCredentials {
    /// Alias or username the org was selected by.
    pub alias: String,
}

/// The active authentication mode.
#[derive(Debug, Clone)]
pub enum Credentials {
    Interactive(InteractiveCredentials),
    Delegated(DelegatedCredentials),
}

impl Credentials {
    pub fn fingerprint(&self) -> Fingerprint {
        match self {
            Credentials::Interactive(c) => Fingerprint::derive(&format!("interactive:{}", c.client_id)),
            Credentials::Delegated(c) => Fingerprint::derive(&format!("delegated:{}", c.alias)),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Credentials::Interactive(_) => "interactive",
            Credentials::Delegated(_) => "delegated",
        }
    }

    /// Human readable description for status output.
    pub fn describe(&self) -> String {
        match self {
            Credentials::Interactive(c) => {
                format!("interactive OAuth (client {}) via {}", c.client_id, c.login_url)
            }
            Credentials::Delegated(c) => format!("Salesforce CLI org '{}'", c.alias),
        }
    }
}

/// Resolves [`Credentials`] from settings and the external session source.
#[derive(Clone)]
pub struct CredentialResolver {
    settings: AuthSettings,
    sessions: Arc<dyn ExternalSessionSource>,
}

impl CredentialResolver {
    pub fn new(settings: AuthSettings, sessions: Arc<dyn ExternalSessionSource>) -> Self {
        Self { settings, sessions }
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    pub fn sessions(&self) -> &Arc<dyn ExternalSessionSource> {
        &self.sessions
    }

    /// Pick the active credentials.
    ///
    /// Precedence: an explicit client id/secret pair, then a named org alias,
    /// then the only org the external source knows about.
    pub async fn resolve(&self) -> Result<Credentials> {
        let s = &self.settings;

        if s.client_id.is_some() || s.client_secret.is_some() {
            return self.resolve_interactive().map(Credentials::Interactive);
        }

        if let Some(alias) = &s.org_alias {
            let orgs = self.sessions.list_sessions(false).await?;
            if orgs.iter().any(|o| o.matches(alias)) {
                info!("Using Salesforce CLI org '{}'", alias);
                return Ok(Credentials::Delegated(DelegatedCredentials {
                    alias: alias.clone(),
                }));
            }
            let available: Vec<&str> = orgs.iter().map(|o| o.display_name()).collect();
            return Err(DataCloudError::config(format!(
                "Org '{}' not found. Available orgs: {}",
                alias,
                if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.join(", ")
                }
            )));
        }

        let orgs = self.sessions.list_sessions(false).await?;
        match orgs.as_slice() {
            [only] => {
                let alias = only.display_name().to_string();
                info!("No org configured, using the only Salesforce CLI org '{}'", alias);
                Ok(Credentials::Delegated(DelegatedCredentials { alias }))
            }
            [] => Err(DataCloudError::config(
                "No credentials configured. Set SF_CLIENT_ID and SF_CLIENT_SECRET, \
                 or log in with 'sf org login web' and set DC_DEFAULT_ORG.",
            )),
            many => {
                let names: Vec<&str> = many.iter().map(|o| o.display_name()).collect();
                Err(DataCloudError::config(format!(
                    "Several Salesforce CLI orgs are available ({}); set DC_DEFAULT_ORG to pick one.",
                    names.join(", ")
                )))
            }
        }
    }

    fn resolve_interactive(&self) -> Result<InteractiveCredentials> {
        let s = &self.settings;

        let mut missing = Vec::new();
        if s.client_id.is_none() {
            missing.push("SF_CLIENT_ID");
        }
        if s.client_secret.is_none() {
            missing.push("SF_CLIENT_SECRET");
        }
        if !missing.is_empty() {
            return Err(DataCloudError::config(format!(
                "Interactive login requires {}",
                missing.join(" and ")
            )));
        }

        let login_url = normalize_base_url(&s.login_url)
            .ok_or_else(|| DataCloudError::config(format!("Invalid login URL: {}", s.login_url)))?;

        let redirect_uri = Url::parse(&s.callback_url).map_err(|e| {
            DataCloudError::config(format!("Invalid callback URL {}: {}", s.callback_url, e))
        })?;
        if redirect_uri.port_or_known_default().is_none() || redirect_uri.host_str().is_none() {
            return Err(DataCloudError::config(format!(
                "Callback URL must include a host and port: {}",
                s.callback_url
            )));
        }

        debug!("Resolved interactive credentials against {}", login_url);

        Ok(InteractiveCredentials {
            client_id: s.client_id.clone().unwrap_or_default(),
            client_secret: s.client_secret.clone().unwrap_or_default(),
            login_url,
            redirect_uri,
            scopes: s.scopes.clone(),
        })
    }
}

/// Parse a host or URL into a base URL, assuming `https` when no scheme is given.
pub fn normalize_base_url(raw: &str) -> Option<Url> {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() {
        return None;
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&with_scheme).ok()?;
    url.host_str()?;
    Some(url)
}
