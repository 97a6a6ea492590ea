//! Tenant token exchange.
//!
//! Ingestion and bulk endpoints live on a separate tenant host and need a
//! token derived from the platform token. The derived token is kept in memory
//! only and is re-derived whenever the platform token is refreshed.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use super::credentials::normalize_base_url;
use super::session::{PlatformAccess, PlatformTokenProvider};
use crate::api::http::{join_url, HttpClient};
use crate::error::{DataCloudError, Result};

pub const TENANT_EXCHANGE_PATH: &str = "/services/a360/token";
const GRANT_TYPE: &str = "urn:salesforce:grant-type:external:cdp";
const SUBJECT_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:access_token";

/// A tenant-scoped token and the host it is valid for.
#[derive(Clone)]
pub struct TenantToken {
    pub tenant_access_token: String,
    /// Never the platform instance URL.
    pub tenant_base_url: Url,
    pub obtained_at: DateTime<Utc>,
    /// Issuance time of the platform token this was derived from.
    platform_issued_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl TenantToken {
    fn is_current_for(&self, platform: &PlatformAccess, now: DateTime<Utc>) -> bool {
        platform.issued_at <= self.platform_issued_at && self.expires_at.map_or(true, |exp| now < exp)
    }
}

impl fmt::Debug for TenantToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantToken")
            .field("tenant_access_token", &"[REDACTED]")
            .field("tenant_base_url", &self.tenant_base_url.as_str())
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

#[derive(Deserialize)]
struct ExchangeResponse {
    access_token: String,
    instance_url: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

pub struct TenantTokenExchanger {
    platform: Arc<dyn PlatformTokenProvider>,
    http: HttpClient,
    current: Mutex<Option<TenantToken>>,
}

impl TenantTokenExchanger {
    pub fn new(platform: Arc<dyn PlatformTokenProvider>, http: HttpClient) -> Self {
        Self {
            platform,
            http,
            current: Mutex::new(None),
        }
    }

    pub async fn get_tenant_session(&self) -> Result<TenantToken> {
        let platform = self.platform.ensure_access().await?;

        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref() {
            if token.is_current_for(&platform, Utc::now()) {
                return Ok(token.clone());
            }
            debug!("Platform token changed since tenant exchange, re-deriving");
        }

        let token = self.exchange(&platform).await?;
        *current = Some(token.clone());
        Ok(token)
    }

    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
    }

    async fn exchange(&self, platform: &PlatformAccess) -> Result<TenantToken> {
        let instance = normalize_base_url(&platform.instance_url).ok_or_else(|| {
            DataCloudError::auth(format!("Invalid platform instance URL: {}", platform.instance_url))
        })?;
        let url = join_url(&instance, TENANT_EXCHANGE_PATH);
        debug!("Exchanging platform token at {}", url);

        let form = [
            ("grant_type", GRANT_TYPE),
            ("subject_token", platform.access_token.as_str()),
            ("subject_token_type", SUBJECT_TOKEN_TYPE),
        ];
        let response = self
            .http
            .send(self.http.request(Method::POST, url).form(&form))
            .await
            .map_err(|e| DataCloudError::auth(format!("Tenant token exchange failed: {}", e)))?;

        if !response.status.is_success() {
            return Err(DataCloudError::auth_with_details(
                format!("Tenant token exchange returned {}", response.status),
                response.body,
            ));
        }

        let body: ExchangeResponse = serde_json::from_value(response.body.clone()).map_err(|e| {
            DataCloudError::auth_with_details(format!("Malformed tenant token response: {}", e), response.body)
        })?;
        let tenant_base_url = normalize_base_url(&body.instance_url).ok_or_else(|| {
            DataCloudError::auth(format!("Tenant exchange returned an invalid URL: {}", body.instance_url))
        })?;

        let obtained_at = Utc::now();
        info!("Obtained tenant token for {}", tenant_base_url);
        Ok(TenantToken {
            tenant_access_token: body.access_token,
            tenant_base_url,
            obtained_at,
            platform_issued_at: platform.issued_at,
            expires_at: body.expires_in.map(|secs| obtained_at + Duration::seconds(secs)),
        })
    }
}
