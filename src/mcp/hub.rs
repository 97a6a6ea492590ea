//! Per-org service bundle shared by every tool call.
//!
//! The auth session, dispatcher and query executor are built once for the
//! targeted org. Switching orgs swaps the whole bundle so in-flight calls keep
//! the services they started with.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::api::{connect_base, HttpClient, QueryExecutor, RequestDispatcher};
use crate::auth::{
    CredentialResolver, ExternalSessionSource, PlatformAuthSession, PlatformTokenProvider,
    TenantTokenExchanger, TokenCache,
};
use crate::config::Config;
use crate::error::{DataCloudError, Result};

/// Everything a tool needs to talk to one org.
pub struct Services {
    pub session: Arc<PlatformAuthSession>,
    pub dispatcher: Arc<RequestDispatcher>,
    pub executor: QueryExecutor,
    /// Connect API prefix, e.g. `/services/data/v63.0/ssot`.
    pub connect_base: String,
    pub api_version: String,
    pub table_filter: String,
}

impl Services {
    /// Build the bundle, optionally overriding the configured org alias.
    pub fn build(
        config: &Config,
        sessions: Arc<dyn ExternalSessionSource>,
        org_alias: Option<String>,
    ) -> Result<Self> {
        let mut auth = config.auth.clone();
        if org_alias.is_some() {
            auth.org_alias = org_alias;
        }

        let http = HttpClient::new()?;
        let resolver = CredentialResolver::new(auth, sessions);
        let session = Arc::new(PlatformAuthSession::new(
            resolver,
            TokenCache::new(&config.token_cache_path),
            http.clone(),
        ));
        let platform: Arc<dyn PlatformTokenProvider> = session.clone();
        let tenant = Arc::new(TenantTokenExchanger::new(platform.clone(), http.clone()));
        let dispatcher = Arc::new(RequestDispatcher::new(
            http,
            platform,
            tenant,
            config.routes.clone(),
        ));
        let executor = QueryExecutor::new(dispatcher.clone(), config.query.clone());

        Ok(Self {
            session,
            dispatcher,
            executor,
            connect_base: connect_base(&config.query.api_version),
            api_version: config.query.api_version.clone(),
            table_filter: config.table_filter.clone(),
        })
    }

    /// Connect API path for `suffix`, which must start with `/`.
    pub fn connect(&self, suffix: &str) -> String {
        format!("{}{}", self.connect_base, suffix)
    }

    /// Org alias this bundle is bound to, if delegated.
    pub fn org_alias(&self) -> Option<&str> {
        self.session.resolver().settings().org_alias.as_deref()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("org_alias", &self.org_alias())
            .field("connect_base", &self.connect_base)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Holds the current [`Services`] and rebuilds them when the target org changes.
pub struct SessionHub {
    config: Config,
    sessions: Arc<dyn ExternalSessionSource>,
    current: RwLock<Arc<Services>>,
}

impl SessionHub {
    pub fn new(config: Config, sessions: Arc<dyn ExternalSessionSource>) -> Result<Self> {
        let services = Services::build(&config, sessions.clone(), None)?;
        Ok(Self {
            config,
            sessions,
            current: RwLock::new(Arc::new(services)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<dyn ExternalSessionSource> {
        &self.sessions
    }

    pub async fn services(&self) -> Arc<Services> {
        self.current.read().await.clone()
    }

    /// Point every subsequent tool call at another Salesforce CLI org.
    pub async fn set_target_org(&self, alias: &str) -> Result<Arc<Services>> {
        if self.config.auth.client_id.is_some() || self.config.auth.client_secret.is_some() {
            return Err(DataCloudError::config(
                "Interactive OAuth credentials are configured; unset SF_CLIENT_ID and \
                 SF_CLIENT_SECRET to switch between Salesforce CLI orgs",
            ));
        }

        let alias = alias.trim();
        if alias.is_empty() {
            return Err(DataCloudError::config("Org alias must not be empty"));
        }

        if self.sessions.find_session(alias, true).await?.is_none() {
            let orgs = self.sessions.list_sessions(false).await?;
            let names: Vec<&str> = orgs.iter().map(|o| o.display_name()).collect();
            return Err(DataCloudError::config(format!(
                "Org '{}' not found. Available orgs: {}",
                alias,
                if names.is_empty() {
                    "(none)".to_string()
                } else {
                    names.join(", ")
                }
            )));
        }

        let services = Arc::new(Services::build(
            &self.config,
            self.sessions.clone(),
            Some(alias.to_string()),
        )?);
        *self.current.write().await = services.clone();
        info!("Target org set to '{}'", alias);
        Ok(services)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{QuerySettings, RouteTable};
    use crate::auth::testing::{settings, ExternalSession, StaticSessions};
    use std::path::Path;

    pub fn config(cache_dir: &Path, org: Option<&str>) -> Config {
        let mut auth = settings();
        auth.org_alias = org.map(str::to_string);
        Config {
            auth,
            token_cache_path: cache_dir.join("token.json"),
            routes: RouteTable::default(),
            query: QuerySettings::default(),
            table_filter: "%".to_string(),
        }
    }

    /// Hub bound to one connected CLI org serving `instance_url`.
    pub fn hub_for(cache_dir: &Path, instance_url: &str) -> SessionHub {
        let org = ExternalSession::connected("dev", "00D!dev", instance_url);
        SessionHub::new(
            config(cache_dir, Some("dev")),
            Arc::new(StaticSessions::new(vec![org])),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_set_target_org_swaps_services() {
        let dir = tempfile::tempdir().unwrap();
        let orgs = vec![
            ExternalSession::connected("dev", "00D!dev", "https://dev.my.salesforce.com"),
            ExternalSession::connected("prod", "00D!prod", "https://prod.my.salesforce.com"),
        ];
        let hub = SessionHub::new(
            config(dir.path(), Some("dev")),
            Arc::new(StaticSessions::new(orgs)),
        )
        .unwrap();

        assert_eq!(hub.services().await.org_alias(), Some("dev"));
        hub.set_target_org("prod").await.unwrap();
        assert_eq!(hub.services().await.org_alias(), Some("prod"));

        let access = hub.services().await.session.ensure_access().await.unwrap();
        assert_eq!(access.access_token, "00D!prod");
    }

    #[tokio::test]
    async fn test_unknown_org_keeps_current_target() {
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), "https://dev.my.salesforce.com");

        let err = hub.set_target_org("missing").await.unwrap_err();
        assert_eq!(err.kind(), "configuration_error");
        assert!(err.to_string().contains("dev"));
        assert_eq!(hub.services().await.org_alias(), Some("dev"));
    }

    #[tokio::test]
    async fn test_interactive_mode_refuses_org_switch() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path(), None);
        cfg.auth.client_id = Some("client".into());
        cfg.auth.client_secret = Some("secret".into());
        let hub = SessionHub::new(cfg, Arc::new(StaticSessions::new(vec![]))).unwrap();

        let err = hub.set_target_org("dev").await.unwrap_err();
        assert_eq!(err.kind(), "configuration_error");
    }

    #[test]
    fn test_connect_paths() {
        let dir = tempfile::tempdir().unwrap();
        let services = Services::build(
            &config(dir.path(), None),
            Arc::new(StaticSessions::new(vec![])),
            None,
        )
        .unwrap();
        assert_eq!(services.connect("/segments"), "/services/data/v63.0/ssot/segments");
        assert!(format!("{:?}", services).contains("api_version: \"v63.0\""));
    }
}
