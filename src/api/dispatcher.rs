//! Authenticated request execution.
//!
//! [`RequestDispatcher::call`] picks the token for a path from the
//! [`RouteTable`], sends the request, retries exactly once after a 401 with a
//! freshly acquired token, and turns every other non-2xx response into
//! [`DataCloudError::Api`] with the provider body intact.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::http::{join_url, HttpClient, HttpResponse};
use super::routes::{RouteTable, TokenRoute};
use crate::auth::{normalize_base_url, PlatformTokenProvider, TenantTokenExchanger};
use crate::error::{DataCloudError, Result};

/// One request against the platform or tenant host.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Percent-encode one path segment.
pub fn encode_segment(segment: &str) -> String {
    let mut url = match Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return segment.to_string(),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

pub struct RequestDispatcher {
    http: HttpClient,
    platform: Arc<dyn PlatformTokenProvider>,
    tenant: Arc<TenantTokenExchanger>,
    routes: RouteTable,
}

impl RequestDispatcher {
    pub fn new(
        http: HttpClient,
        platform: Arc<dyn PlatformTokenProvider>,
        tenant: Arc<TenantTokenExchanger>,
        routes: RouteTable,
    ) -> Self {
        Self {
            http,
            platform,
            tenant,
            routes,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Execute `request` and return the parsed body of a 2xx response.
    pub async fn call(&self, request: &ApiRequest) -> Result<Value> {
        let route = self.routes.route_for(&request.path);
        let started = Instant::now();

        let mut response = self.send_once(request, route).await?;
        if response.status == StatusCode::UNAUTHORIZED {
            warn!(
                "{} {} returned 401, refreshing {:?} token and retrying once",
                request.method, request.path, route
            );
            self.platform.invalidate().await;
            if route == TokenRoute::Tenant {
                self.tenant.invalidate().await;
            }
            response = self.send_once(request, route).await?;
        }

        debug!(
            "{} {} -> {} in {:?}",
            request.method,
            request.path,
            response.status,
            started.elapsed()
        );

        if response.status.is_success() {
            Ok(response.body)
        } else {
            Err(DataCloudError::Api {
                status: response.status.as_u16(),
                body: response.body,
            })
        }
    }

    async fn send_once(&self, request: &ApiRequest, route: TokenRoute) -> Result<HttpResponse> {
        let (base_url, token) = match route {
            TokenRoute::Platform => {
                let access = self.platform.ensure_access().await?;
                let base = normalize_base_url(&access.instance_url).ok_or_else(|| {
                    DataCloudError::auth(format!("Invalid instance URL: {}", access.instance_url))
                })?;
                (base, access.access_token)
            }
            TokenRoute::Tenant => {
                let tenant = self.tenant.get_tenant_session().await?;
                (tenant.tenant_base_url, tenant.tenant_access_token)
            }
        };

        let mut url = join_url(&base_url, &request.path);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(token)
            .header("Accept", "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        self.http.send(builder).await
    }
}
