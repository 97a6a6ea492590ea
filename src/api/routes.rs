//! Which token authorises which path.
//!
//! Most endpoints take the platform token against the instance URL. Paths
//! under a tenant prefix take the exchanged tenant token against the tenant
//! host. The prefix list is configuration, not code.

/// Default prefixes served by the tenant host.
pub const DEFAULT_TENANT_PREFIXES: &[&str] = &["/api/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRoute {
    Platform,
    Tenant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    tenant_prefixes: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::with_tenant_prefixes(DEFAULT_TENANT_PREFIXES.iter().map(|p| p.to_string()).collect())
    }
}

impl RouteTable {
    pub fn with_tenant_prefixes(prefixes: Vec<String>) -> Self {
        let tenant_prefixes = prefixes
            .into_iter()
            .map(|p| {
                if p.starts_with('/') {
                    p
                } else {
                    format!("/{}", p)
                }
            })
            .collect();
        Self { tenant_prefixes }
    }

    pub fn tenant_prefixes(&self) -> &[String] {
        &self.tenant_prefixes
    }

    pub fn route_for(&self, path: &str) -> TokenRoute {
        if self.tenant_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            TokenRoute::Tenant
        } else {
            TokenRoute::Platform
        }
    }
}
