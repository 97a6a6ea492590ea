//! Runtime configuration resolved once from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::{QuerySettings, RouteTable};
use crate::auth::AuthSettings;
use crate::cli::SettingsArgs;

/// Token cache file name under the user's home directory.
pub const TOKEN_CACHE_FILE: &str = ".datacloud_mcp_token.json";

/// Everything the server needs, built once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthSettings,
    pub token_cache_path: PathBuf,
    pub routes: RouteTable,
    pub query: QuerySettings,
    pub table_filter: String,
}

impl Config {
    pub fn from_args(args: &SettingsArgs) -> Result<Self> {
        let token_cache_path = match &args.token_cache {
            Some(path) => PathBuf::from(path),
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(TOKEN_CACHE_FILE),
        };

        let auth = AuthSettings {
            client_id: non_empty(args.client_id.as_deref()),
            client_secret: non_empty(args.client_secret.as_deref()),
            login_url: args.login_url.clone(),
            callback_url: args.callback_url.clone(),
            scopes: split_list(&args.scopes, |c| c.is_whitespace() || c == ','),
            org_alias: non_empty(args.org.as_deref()),
            callback_timeout: Duration::from_secs(args.callback_timeout),
        };

        let routes = RouteTable::with_tenant_prefixes(split_list(&args.tenant_paths, |c| c == ','));

        let query = QuerySettings {
            api_version: args.api_version.clone(),
            dataspace: args.dataspace.clone(),
            default_timeout: Duration::from_secs(args.query_timeout),
            ..QuerySettings::default()
        };

        Ok(Self {
            auth,
            token_cache_path,
            routes,
            query,
            table_filter: args.table_filter.clone(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn split_list(raw: &str, separator: impl Fn(char) -> bool) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "datacloud-mcp",
            "--client-id",
            "abc",
            "--client-secret",
            "shh",
            "--scopes",
            "api, cdp_query_api",
            "--token-cache",
            "/tmp/token.json",
            "--tenant-paths",
            "/api/, /services/data/v63.0/ssot/ingest",
        ])
        .unwrap();

        let config = Config::from_args(&cli.settings).unwrap();
        assert_eq!(config.auth.client_id.as_deref(), Some("abc"));
        assert_eq!(config.auth.scopes, vec!["api", "cdp_query_api"]);
        assert_eq!(config.token_cache_path, PathBuf::from("/tmp/token.json"));
        assert_eq!(config.routes.tenant_prefixes().len(), 2);
    }

    #[test]
    fn test_blank_values_are_treated_as_absent() {
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some(" org ")), Some("org".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
