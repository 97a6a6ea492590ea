//! Platform access token lifecycle.
//!
//! [`PlatformAuthSession`] is constructed once per process and shared by the
//! dispatcher. It serves tokens from memory, then from the on-disk cache, and
//! only then runs the interactive login or reads the delegated session.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};
use url::Url;

use super::cache::{CachedToken, TokenCache};
use super::credentials::{CredentialResolver, Credentials, DelegatedCredentials, InteractiveCredentials};
use super::pkce::{authorize_url, exchange_code, random_state, CallbackListener, PkcePair};
use crate::api::http::HttpClient;
use crate::error::{DataCloudError, Result};

/// Lifetime assumed for a platform token when the provider does not say.
pub const TOKEN_LIFETIME_MINUTES: i64 = 110;

/// Tokens are treated as expired this long before their stated expiry.
pub const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// A usable platform token.
#[derive(Clone, PartialEq, Eq)]
pub struct PlatformAccess {
    pub access_token: String,
    pub instance_url: String,
    /// When the provider issued this token.
    pub issued_at: DateTime<Utc>,
}

impl fmt::Debug for PlatformAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformAccess")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl From<&CachedToken> for PlatformAccess {
    fn from(token: &CachedToken) -> Self {
        Self {
            access_token: token.access_token.clone(),
            instance_url: token.instance_url.clone(),
            issued_at: token.issued_at,
        }
    }
}

/// Source of platform tokens for the dispatcher and the tenant exchanger.
#[async_trait]
pub trait PlatformTokenProvider: Send + Sync {
    async fn ensure_access(&self) -> Result<PlatformAccess>;

    /// Drop the current token so the next call acquires a fresh one.
    async fn invalidate(&self);
}

/// Directs the user to the authorization URL.
pub trait AuthorizationPrompt: Send + Sync {
    fn present(&self, url: &Url);
}

/// Prints the URL to stderr and tries to open a browser.
pub struct BrowserPrompt;

impl AuthorizationPrompt for BrowserPrompt {
    fn present(&self, url: &Url) {
        eprintln!("\nOpen this URL in your browser to log in to Salesforce:\n\n{}\n", url);
        if let Err(e) = open::that(url.as_str()) {
            warn!("Could not open a browser automatically: {}", e);
        }
    }
}

/// Expiry for a token issued at `issued_at`, margin already applied.
fn expiry_for(issued_at: DateTime<Utc>, lifetime: Option<Duration>) -> DateTime<Utc> {
    issued_at + lifetime.unwrap_or_else(|| Duration::minutes(TOKEN_LIFETIME_MINUTES))
        - Duration::minutes(EXPIRY_MARGIN_MINUTES)
}

pub struct PlatformAuthSession {
    resolver: CredentialResolver,
    cache: TokenCache,
    http: HttpClient,
    prompt: Arc<dyn AuthorizationPrompt>,
    credentials: OnceCell<Credentials>,
    /// Serialises acquisition and holds the token in use.
    current: Mutex<Option<CachedToken>>,
    /// Set by `invalidate`; the next delegated read bypasses the listing cache.
    refresh_external: AtomicBool,
}

impl PlatformAuthSession {
    pub fn new(resolver: CredentialResolver, cache: TokenCache, http: HttpClient) -> Self {
        Self {
            resolver,
            cache,
            http,
            prompt: Arc::new(BrowserPrompt),
            credentials: OnceCell::new(),
            current: Mutex::new(None),
            refresh_external: AtomicBool::new(false),
        }
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn AuthorizationPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    /// Credentials for this session, resolved on first use and then fixed.
    pub async fn credentials(&self) -> Result<&Credentials> {
        self.credentials
            .get_or_try_init(|| self.resolver.resolve())
            .await
    }

    async fn acquire(&self, creds: &Credentials) -> Result<CachedToken> {
        let fingerprint = creds.fingerprint();

        if let Some(cached) = self.cache.load(&fingerprint) {
            info!("Using cached platform token for {}", cached.instance_url);
            return Ok(cached);
        }

        let token = match creds {
            Credentials::Interactive(c) => self.login_interactive(c).await?,
            Credentials::Delegated(c) => self.read_delegated(c).await?,
        };
        let token = CachedToken {
            fingerprint: fingerprint.as_str().to_string(),
            ..token
        };

        self.cache.save(&token);
        Ok(token)
    }

    async fn login_interactive(&self, creds: &InteractiveCredentials) -> Result<CachedToken> {
        info!("Starting interactive OAuth login");

        let listener = CallbackListener::bind(&creds.redirect_uri).await?;
        let redirect_uri = listener.redirect_uri().clone();
        let pkce = PkcePair::generate();
        let state = random_state();

        self.prompt
            .present(&authorize_url(creds, &redirect_uri, &pkce, &state));

        let timeout = self.resolver.settings().callback_timeout;
        let code = listener.wait_for_code(&state, timeout).await?;
        let grant = exchange_code(&self.http, creds, &redirect_uri, &code, &pkce.verifier).await?;

        let lifetime = grant.expires_in.and_then(|d| Duration::from_std(d).ok());
        Ok(CachedToken {
            access_token: grant.access_token,
            expires_at: expiry_for(grant.issued_at, lifetime),
            fingerprint: String::new(),
            instance_url: grant.instance_url,
            issued_at: grant.issued_at,
        })
    }

    async fn read_delegated(&self, creds: &DelegatedCredentials) -> Result<CachedToken> {
        let sessions = self.resolver.sessions();
        let refresh = self.refresh_external.swap(false, Ordering::SeqCst);

        let mut session = sessions.find_session(&creds.alias, refresh).await?;
        if !refresh && session.as_ref().map_or(true, |s| s.access_token.is_empty()) {
            debug!("Re-reading Salesforce CLI orgs for '{}'", creds.alias);
            session = sessions.find_session(&creds.alias, true).await?;
        }

        let session = session.ok_or_else(|| {
            DataCloudError::config(format!(
                "Org '{}' is no longer known to the Salesforce CLI",
                creds.alias
            ))
        })?;

        let now = Utc::now();
        if !session.is_usable(now) {
            return Err(DataCloudError::auth(format!(
                "Salesforce CLI session for '{}' is not usable (status: {}). \
                 Run: sf org login web --alias {}",
                creds.alias, session.connected_status, creds.alias
            )));
        }

        let default_expiry = expiry_for(now, None);
        let expires_at = match session.expires_at {
            Some(reported) => std::cmp::min(reported - Duration::minutes(EXPIRY_MARGIN_MINUTES), default_expiry),
            None => default_expiry,
        };

        info!("Using Salesforce CLI session for '{}'", session.display_name());
        Ok(CachedToken {
            access_token: session.access_token,
            expires_at,
            fingerprint: String::new(),
            instance_url: session.instance_url,
            issued_at: now,
        })
    }
}

#[async_trait]
impl PlatformTokenProvider for PlatformAuthSession {
    async fn ensure_access(&self) -> Result<PlatformAccess> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref() {
            if Utc::now() < token.expires_at {
                return Ok(PlatformAccess::from(token));
            }
            debug!("In-memory platform token expired");
        }

        let creds = self.credentials().await?;
        let token = self.acquire(creds).await?;
        let access = PlatformAccess::from(&token);
        *current = Some(token);
        Ok(access)
    }

    async fn invalidate(&self) {
        let mut current = self.current.lock().await;
        *current = None;
        self.cache.invalidate();
        self.refresh_external.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::credentials::tests::settings;
    use crate::auth::sf_cli::tests::StaticSessions;
    use crate::auth::sf_cli::ExternalSession;
    use std::sync::atomic::AtomicUsize;
    use tempfile::{tempdir, TempDir};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Fixed platform token that counts refreshes.
    pub struct StaticPlatform {
        token: std::sync::Mutex<PlatformAccess>,
        pub invalidations: AtomicUsize,
    }

    impl StaticPlatform {
        pub fn new(instance_url: &str, token: &str) -> Self {
            Self {
                token: std::sync::Mutex::new(PlatformAccess {
                    access_token: token.to_string(),
                    instance_url: instance_url.to_string(),
                    issued_at: Utc::now(),
                }),
                invalidations: AtomicUsize::new(0),
            }
        }

        /// Simulate a refresh: later issuance time and a new token.
        pub fn rotate(&self, token: &str) {
            let mut current = self.token.lock().unwrap();
            current.access_token = token.to_string();
            current.issued_at = current.issued_at + Duration::seconds(1);
        }
    }

    #[async_trait]
    impl PlatformTokenProvider for StaticPlatform {
        async fn ensure_access(&self) -> Result<PlatformAccess> {
            Ok(self.token.lock().unwrap().clone())
        }

        async fn invalidate(&self) {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Answers the authorization URL by calling the redirect URI directly.
    struct ScriptedBrowser {
        forged_state: Option<String>,
    }

    impl AuthorizationPrompt for ScriptedBrowser {
        fn present(&self, url: &Url) {
            let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
            let mut callback = Url::parse(&params["redirect_uri"]).unwrap();
            let state = self
                .forged_state
                .clone()
                .unwrap_or_else(|| params["state"].clone());
            callback
                .query_pairs_mut()
                .append_pair("code", "auth-code")
                .append_pair("state", &state);
            tokio::spawn(async move {
                let _ = reqwest::get(callback).await;
            });
        }
    }

    fn interactive_session(server: &MockServer, dir: &TempDir, forged_state: Option<&str>) -> PlatformAuthSession {
        let mut s = settings();
        s.client_id = Some("client".into());
        s.client_secret = Some("secret".into());
        s.login_url = server.uri();
        s.callback_url = "http://127.0.0.1:0/Callback".into();

        let resolver = CredentialResolver::new(s, Arc::new(StaticSessions::new(vec![])));
        PlatformAuthSession::new(
            resolver,
            TokenCache::new(dir.path().join("token.json")),
            HttpClient::new().unwrap(),
        )
        .with_prompt(Arc::new(ScriptedBrowser {
            forged_state: forged_state.map(str::to_string),
        }))
    }

    async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "00D!fresh",
                "instance_url": "https://fresh.my.salesforce.com"
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_valid_cache_needs_no_network() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, 0).await;
        let dir = tempdir().unwrap();
        let session = interactive_session(&server, &dir, None);

        let fingerprint = session.credentials().await.unwrap().fingerprint();
        let now = Utc::now();
        session.cache().save(&CachedToken {
            access_token: "00D!cached".into(),
            expires_at: now + Duration::minutes(30),
            fingerprint: fingerprint.to_string(),
            instance_url: "https://cached.my.salesforce.com".into(),
            issued_at: now,
        });

        let first = session.ensure_access().await.unwrap();
        let second = session.ensure_access().await.unwrap();
        assert_eq!(first.access_token, "00D!cached");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_interactive_login_persists_token() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, 1).await;
        let dir = tempdir().unwrap();
        let session = interactive_session(&server, &dir, None);

        let access = session.ensure_access().await.unwrap();
        assert_eq!(access.access_token, "00D!fresh");
        assert_eq!(access.instance_url, "https://fresh.my.salesforce.com");

        let fingerprint = session.credentials().await.unwrap().fingerprint();
        let cached = session.cache().load(&fingerprint).unwrap();
        assert_eq!(cached.access_token, "00D!fresh");
        let lifetime = cached.expires_at - cached.issued_at;
        assert_eq!(lifetime.num_minutes(), TOKEN_LIFETIME_MINUTES - EXPIRY_MARGIN_MINUTES);

        let again = session.ensure_access().await.unwrap();
        assert_eq!(again, access);
    }

    #[tokio::test]
    async fn test_state_mismatch_rejects_and_persists_nothing() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, 0).await;
        let dir = tempdir().unwrap();
        let session = interactive_session(&server, &dir, Some("forged-state"));

        let err = session.ensure_access().await.unwrap_err();
        assert_eq!(err.kind(), "auth_error");
        assert!(err.to_string().contains("state"));
        assert!(!session.cache().path().exists());
    }

    #[tokio::test]
    async fn test_changed_fingerprint_forces_login() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, 1).await;
        let dir = tempdir().unwrap();
        let session = interactive_session(&server, &dir, None);

        let now = Utc::now();
        session.cache().save(&CachedToken {
            access_token: "00D!other-client".into(),
            expires_at: now + Duration::minutes(30),
            fingerprint: "issued-under-another-client".into(),
            instance_url: "https://cached.my.salesforce.com".into(),
            issued_at: now,
        });

        let access = session.ensure_access().await.unwrap();
        assert_eq!(access.access_token, "00D!fresh");
    }

    fn delegated_session(dir: &TempDir, org: ExternalSession) -> PlatformAuthSession {
        let mut s = settings();
        s.org_alias = org.alias.clone();
        let resolver = CredentialResolver::new(s, Arc::new(StaticSessions::new(vec![org])));
        PlatformAuthSession::new(
            resolver,
            TokenCache::new(dir.path().join("token.json")),
            HttpClient::new().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_delegated_session_is_wrapped_and_cached() {
        let dir = tempdir().unwrap();
        let org = ExternalSession::connected("dev", "00D!cli", "https://dev.my.salesforce.com");
        let session = delegated_session(&dir, org);

        let access = session.ensure_access().await.unwrap();
        assert_eq!(access.access_token, "00D!cli");

        let fingerprint = session.credentials().await.unwrap().fingerprint();
        assert!(session.cache().load(&fingerprint).is_some());
    }

    #[tokio::test]
    async fn test_stale_delegated_session_is_auth_error() {
        let dir = tempdir().unwrap();
        let mut org = ExternalSession::connected("dev", "00D!cli", "https://dev.my.salesforce.com");
        org.connected_status = "RefreshTokenAuthError".into();
        let session = delegated_session(&dir, org);

        let err = session.ensure_access().await.unwrap_err();
        assert_eq!(err.kind(), "auth_error");
        assert!(err.to_string().contains("sf org login web --alias dev"));
        assert!(!session.cache().path().exists());
    }

    #[tokio::test]
    async fn test_invalidate_clears_cache() {
        let dir = tempdir().unwrap();
        let org = ExternalSession::connected("dev", "00D!cli", "https://dev.my.salesforce.com");
        let session = delegated_session(&dir, org);

        session.ensure_access().await.unwrap();
        assert!(session.cache().path().exists());

        session.invalidate().await;
        assert!(!session.cache().path().exists());
        assert!(session.ensure_access().await.is_ok());
    }
}
