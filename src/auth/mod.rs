//! Authentication and token lifecycle.
//!
//! - [`CredentialResolver`] picks interactive or delegated credentials.
//! - [`TokenCache`] persists the platform token between runs.
//! - [`PlatformAuthSession`] hands out platform tokens.
//! - [`TenantTokenExchanger`] derives tenant tokens for ingestion paths.

mod cache;
mod credentials;
mod pkce;
mod session;
mod sf_cli;
mod tenant;

pub use cache::TokenCache;
pub use credentials::{normalize_base_url, AuthSettings, CredentialResolver, Credentials};
pub use session::{PlatformAuthSession, PlatformTokenProvider};
pub use sf_cli::{ExternalSessionSource, SfCliSource};
pub use tenant::TenantTokenExchanger;

#[cfg(test)]
pub(crate) mod testing {
    pub use super::credentials::tests::settings;
    pub use super::session::tests::StaticPlatform;
    pub use super::sf_cli::tests::StaticSessions;
    pub use super::sf_cli::ExternalSession;
}
