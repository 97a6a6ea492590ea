use clap::{Args, Parser, Subcommand};

/// Data Cloud MCP server - Salesforce Data Cloud tools over the Model Context Protocol
#[derive(Parser)]
#[command(name = "datacloud-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Connection and credential settings. Every flag can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Connected app client id (enables interactive OAuth login)
    #[arg(long, env = "SF_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Connected app client secret
    #[arg(long, env = "SF_CLIENT_SECRET", global = true, hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Login host used for the authorization and token endpoints
    #[arg(
        long,
        env = "SF_LOGIN_URL",
        default_value = "login.salesforce.com",
        global = true
    )]
    pub login_url: String,

    /// Loopback redirect URI registered on the connected app
    #[arg(
        long,
        env = "SF_CALLBACK_URL",
        default_value = "http://localhost:55556/Callback",
        global = true
    )]
    pub callback_url: String,

    /// OAuth scopes, separated by spaces or commas
    #[arg(
        long,
        env = "SF_OAUTH_SCOPES",
        default_value = "api cdp_query_api cdp_profile_api",
        global = true
    )]
    pub scopes: String,

    /// Salesforce CLI org alias or username (delegated login)
    #[arg(long, env = "DC_DEFAULT_ORG", global = true)]
    pub org: Option<String>,

    /// LIKE pattern applied by the list_tables tool
    #[arg(
        long,
        env = "DEFAULT_LIST_TABLE_FILTER",
        default_value = "%",
        global = true
    )]
    pub table_filter: String,

    /// Token cache file. Defaults to ~/.datacloud_mcp_token.json
    #[arg(long, env = "DC_TOKEN_CACHE", global = true)]
    pub token_cache: Option<String>,

    /// Connect API version
    #[arg(long, env = "DC_API_VERSION", default_value = "v63.0", global = true)]
    pub api_version: String,

    /// Dataspace used for SQL queries
    #[arg(long, env = "DC_DATASPACE", default_value = "default", global = true)]
    pub dataspace: String,

    /// Comma-separated path prefixes that use the tenant token
    #[arg(
        long,
        env = "DC_TENANT_PATH_PREFIXES",
        default_value = "/api/",
        global = true
    )]
    pub tenant_paths: String,

    /// Default overall budget for a SQL query, in seconds
    #[arg(
        long,
        env = "DC_QUERY_TIMEOUT_SECS",
        default_value_t = 600,
        global = true
    )]
    pub query_timeout: u64,

    /// How long to wait for the OAuth browser redirect, in seconds
    #[arg(
        long,
        env = "DC_CALLBACK_TIMEOUT_SECS",
        default_value_t = 300,
        global = true
    )]
    pub callback_timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Acquire and cache a platform access token now
    Login,
    /// Remove the cached access token
    Logout,
    /// Show which credentials are active and whether a cached token is usable
    Status,
    /// List orgs known to the Salesforce CLI
    Orgs,
}
