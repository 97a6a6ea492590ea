//! Authorization code flow with PKCE against the Salesforce login host.
//!
//! The browser step is modelled as a bounded wait on a one-shot loopback
//! listener. The listener is owned by [`CallbackListener`] and consumed by
//! [`CallbackListener::wait_for_code`], so the port is released on every exit
//! path: success, provider error, state mismatch or timeout.

use std::fmt;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use rand::RngCore;
use reqwest::Method;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use super::credentials::InteractiveCredentials;
use crate::api::http::{join_url, HttpClient};
use crate::error::{DataCloudError, Result};

pub const AUTHORIZE_PATH: &str = "/services/oauth2/authorize";
pub const TOKEN_PATH: &str = "/services/oauth2/token";

/// Largest callback request we are willing to read.
const MAX_REQUEST_BYTES: usize = 16 * 1024;

/// A connection that sends no request head within this long is dropped.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(10);

const SUCCESS_PAGE: &str = "<html><body><h1>Authentication successful</h1>\
    <p>You can close this window and return to your assistant.</p></body></html>";
const FAILURE_PAGE: &str = "<html><body><h1>Authentication failed</h1>\
    <p>Return to your assistant for details.</p></body></html>";

/// Base64url encoded random bytes.
fn random_base64url(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(&bytes)
}

/// A PKCE code verifier and its S256 challenge.
#[derive(Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let verifier = random_base64url(32);
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self { verifier, challenge }
    }
}

/// Random anti-CSRF state nonce.
pub fn random_state() -> String {
    random_base64url(16)
}

/// Build the URL the user is sent to.
pub fn authorize_url(
    creds: &InteractiveCredentials,
    redirect_uri: &Url,
    pkce: &PkcePair,
    state: &str,
) -> Url {
    let mut url = join_url(&creds.login_url, AUTHORIZE_PATH);
    url.query_pairs_mut()
        .append_pair("client_id", &creds.client_id)
        .append_pair("redirect_uri", redirect_uri.as_str())
        .append_pair("response_type", "code")
        .append_pair("scope", &creds.scopes.join(" "))
        .append_pair("prompt", "login")
        .append_pair("code_challenge", &pkce.challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("state", state);
    url
}

/// What arrived on the callback path.
#[derive(Debug, PartialEq, Eq)]
enum CallbackOutcome {
    Code(String),
    ProviderError(String),
    StateMismatch,
    Malformed(String),
}

/// Loopback listener bound for exactly one authorization callback.
pub struct CallbackListener {
    listener: TcpListener,
    redirect_uri: Url,
}

impl CallbackListener {
    /// Bind the host and port named by `redirect_uri`.
    ///
    /// Port 0 binds an ephemeral port; [`Self::redirect_uri`] then reports the
    /// port actually bound.
    pub async fn bind(redirect_uri: &Url) -> Result<Self> {
        let host = match redirect_uri.host_str() {
            Some("localhost") | None => "127.0.0.1".to_string(),
            Some(host) => host.trim_matches(|c| c == '[' || c == ']').to_string(),
        };
        let port = redirect_uri.port_or_known_default().unwrap_or(0);

        let listener = TcpListener::bind((host.as_str(), port)).await.map_err(|e| {
            DataCloudError::auth(format!(
                "Failed to bind OAuth callback listener on {}:{}: {}",
                host, port, e
            ))
        })?;

        let mut redirect_uri = redirect_uri.clone();
        if port == 0 {
            let bound = listener
                .local_addr()
                .map_err(|e| DataCloudError::auth(format!("Callback listener has no address: {}", e)))?;
            let _ = redirect_uri.set_port(Some(bound.port()));
        }

        info!("Listening for OAuth callback on {}", redirect_uri);
        Ok(Self { listener, redirect_uri })
    }

    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// Accept requests until the callback path is hit or `timeout` elapses.
    ///
    /// Connections are read concurrently so an idle preconnect socket cannot
    /// hold up the real redirect. Requests for other paths (favicon and the
    /// like) get a 404 and the wait continues.
    pub async fn wait_for_code(self, expected_state: &str, timeout: Duration) -> Result<String> {
        let wait = async {
            let mut pending = JoinSet::new();
            loop {
                tokio::select! {
                    accepted = self.listener.accept() => {
                        let (mut stream, peer) = accepted.map_err(|e| {
                            DataCloudError::auth(format!("Failed to accept OAuth callback: {}", e))
                        })?;
                        debug!("OAuth callback connection from {}", peer);
                        pending.spawn(async move {
                            let target = tokio::time::timeout(REQUEST_READ_TIMEOUT, read_request_target(&mut stream))
                                .await
                                .ok()
                                .flatten();
                            (stream, target)
                        });
                    }
                    Some(joined) = pending.join_next() => {
                        let (stream, target) = match joined {
                            Ok(read) => read,
                            Err(e) => {
                                warn!("OAuth callback reader failed: {}", e);
                                continue;
                            }
                        };
                        if let Some(outcome) = self.handle_request(stream, target, expected_state).await {
                            return match outcome {
                                CallbackOutcome::Code(code) => Ok(code),
                                CallbackOutcome::ProviderError(message) => Err(DataCloudError::auth(format!(
                                    "Authorization was denied by the provider: {}",
                                    message
                                ))),
                                CallbackOutcome::StateMismatch => Err(DataCloudError::auth(
                                    "OAuth state mismatch; the callback did not originate from this login",
                                )),
                                CallbackOutcome::Malformed(message) => Err(DataCloudError::auth(message)),
                            };
                        }
                    }
                }
            }
        };

        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(DataCloudError::auth(format!(
                "Timed out after {}s waiting for the OAuth callback",
                timeout.as_secs()
            ))),
        }
    }

    /// Answer one request. `None` means it was not the callback.
    async fn handle_request(
        &self,
        mut stream: TcpStream,
        target: Option<String>,
        expected_state: &str,
    ) -> Option<CallbackOutcome> {
        let target = match target {
            Some(target) => target,
            None => {
                let _ = respond(&mut stream, "400 Bad Request", FAILURE_PAGE).await;
                return None;
            }
        };

        let request_url = match self.redirect_uri.join(&target) {
            Ok(url) => url,
            Err(_) => {
                let _ = respond(&mut stream, "400 Bad Request", FAILURE_PAGE).await;
                return None;
            }
        };

        if request_url.path() != self.redirect_uri.path() {
            debug!("Ignoring request for {}", request_url.path());
            let _ = respond(&mut stream, "404 Not Found", "Not Found").await;
            return None;
        }

        let outcome = classify_callback(&request_url, expected_state);
        let (status, page) = match outcome {
            CallbackOutcome::Code(_) => ("200 OK", SUCCESS_PAGE),
            _ => ("400 Bad Request", FAILURE_PAGE),
        };
        if let Err(e) = respond(&mut stream, status, page).await {
            warn!("Failed to answer OAuth callback: {}", e);
        }
        Some(outcome)
    }
}

fn classify_callback(url: &Url, expected_state: &str) -> CallbackOutcome {
    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return CallbackOutcome::ProviderError(match error_description {
            Some(description) => format!("{}: {}", error, description),
            None => error,
        });
    }
    if state.as_deref() != Some(expected_state) {
        return CallbackOutcome::StateMismatch;
    }
    match code {
        Some(code) if !code.is_empty() => CallbackOutcome::Code(code),
        _ => CallbackOutcome::Malformed("OAuth callback did not include an authorization code".to_string()),
    }
}

/// Read the request head and return the request target.
async fn read_request_target(stream: &mut TcpStream) -> Option<String> {
    let mut buffer = Vec::with_capacity(2048);
    let mut chunk = [0u8; 2048];

    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if buffer.windows(4).any(|w| w == b"\r\n\r\n") || buffer.len() >= MAX_REQUEST_BYTES {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buffer);
    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Some(target.to_string()),
        _ => None,
    }
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    instance_url: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// A platform token freshly issued by the provider.
#[derive(Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub instance_url: String,
    pub expires_in: Option<Duration>,
    pub issued_at: DateTime<Utc>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Exchange an authorization code for a platform access token.
pub async fn exchange_code(
    http: &HttpClient,
    creds: &InteractiveCredentials,
    redirect_uri: &Url,
    code: &str,
    verifier: &str,
) -> Result<TokenGrant> {
    let url = join_url(&creds.login_url, TOKEN_PATH);
    debug!("Exchanging authorization code at {}", url);

    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("redirect_uri", redirect_uri.as_str()),
        ("code_verifier", verifier),
    ];

    let response = http
        .send(http.request(Method::POST, url).form(&form))
        .await
        .map_err(|e| DataCloudError::auth(format!("Token exchange failed: {}", e)))?;

    if !response.status.is_success() {
        return Err(DataCloudError::auth_with_details(
            format!("Token endpoint returned {}", response.status),
            response.body,
        ));
    }

    let token: TokenResponse = serde_json::from_value(response.body)
        .map_err(|e| DataCloudError::auth(format!("Malformed token response: {}", e)))?;
    if token.access_token.is_empty() || token.instance_url.is_empty() {
        return Err(DataCloudError::auth("Token response is missing access_token or instance_url"));
    }

    info!("Obtained platform access token for {}", token.instance_url);
    Ok(TokenGrant {
        access_token: token.access_token,
        instance_url: token.instance_url,
        expires_in: token.expires_in.map(Duration::from_secs),
        issued_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(login_url: &str) -> InteractiveCredentials {
        InteractiveCredentials {
            client_id: "client-123".to_string(),
            client_secret: "secret-456".to_string(),
            login_url: Url::parse(login_url).unwrap(),
            redirect_uri: Url::parse("http://127.0.0.1:0/Callback").unwrap(),
            scopes: vec!["api".to_string(), "cdp_query_api".to_string()],
        }
    }

    #[test]
    fn test_pkce_challenge_is_sha256_of_verifier() {
        let pair = PkcePair::generate();
        assert_eq!(pair.verifier.len(), 43);
        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(pair.verifier.as_bytes()));
        assert_eq!(pair.challenge, expected);
        assert_ne!(PkcePair::generate().verifier, pair.verifier);
    }

    #[test]
    fn test_authorize_url_parameters() {
        let creds = credentials("https://login.salesforce.com");
        let pkce = PkcePair::generate();
        let url = authorize_url(&creds, &creds.redirect_uri, &pkce, "nonce");

        assert_eq!(url.path(), AUTHORIZE_PATH);
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["scope"], "api cdp_query_api");
        assert_eq!(params["prompt"], "login");
        assert_eq!(params["code_challenge"], pkce.challenge);
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["state"], "nonce");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1:0/Callback");
    }

    #[test]
    fn test_classify_callback() {
        let base = Url::parse("http://127.0.0.1:5555/Callback").unwrap();
        let with = |q: &str| {
            let mut u = base.clone();
            u.set_query(Some(q));
            u
        };

        assert_eq!(
            classify_callback(&with("code=abc&state=s1"), "s1"),
            CallbackOutcome::Code("abc".into())
        );
        assert_eq!(
            classify_callback(&with("code=abc&state=forged"), "s1"),
            CallbackOutcome::StateMismatch
        );
        assert_eq!(classify_callback(&with("code=abc"), "s1"), CallbackOutcome::StateMismatch);
        assert!(matches!(
            classify_callback(&with("error=access_denied&state=s1"), "s1"),
            CallbackOutcome::ProviderError(_)
        ));
        assert!(matches!(
            classify_callback(&with("state=s1"), "s1"),
            CallbackOutcome::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_listener_returns_code_and_skips_other_paths() {
        let listener = CallbackListener::bind(&Url::parse("http://127.0.0.1:0/Callback").unwrap())
            .await
            .unwrap();
        let redirect = listener.redirect_uri().clone();
        assert_ne!(redirect.port(), Some(0));

        let client = reqwest::Client::new();
        let favicon = redirect.join("/favicon.ico").unwrap();
        let mut callback = redirect.clone();
        callback.set_query(Some("code=the-code&state=expected"));

        let driver = tokio::spawn(async move {
            let favicon = client.get(favicon).send().await.unwrap();
            assert_eq!(favicon.status(), 404);
            client.get(callback).send().await.unwrap().status()
        });

        let code = listener
            .wait_for_code("expected", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(code, "the-code");
        assert_eq!(driver.await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_idle_connection_does_not_block_callback() {
        let listener = CallbackListener::bind(&Url::parse("http://127.0.0.1:0/Callback").unwrap())
            .await
            .unwrap();
        let redirect = listener.redirect_uri().clone();
        let port = redirect.port().unwrap();
        let mut callback = redirect.clone();
        callback.set_query(Some("code=late-code&state=expected"));

        let driver = tokio::spawn(async move {
            // a preconnect socket that never sends a request
            let idle = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            let status = reqwest::Client::new().get(callback).send().await.unwrap().status();
            drop(idle);
            status
        });

        let code = listener
            .wait_for_code("expected", Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(code, "late-code");
        assert_eq!(driver.await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_listener_times_out_and_releases_port() {
        let listener = CallbackListener::bind(&Url::parse("http://127.0.0.1:0/Callback").unwrap())
            .await
            .unwrap();
        let port = listener.redirect_uri().port().unwrap();

        let err = listener
            .wait_for_code("expected", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "auth_error");

        TcpListener::bind(("127.0.0.1", port)).await.unwrap();
    }

    #[tokio::test]
    async fn test_exchange_code_posts_verifier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code_verifier=verifier-xyz"))
            .and(body_string_contains("client_secret=secret-456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "00D!platform",
                "instance_url": "https://example.my.salesforce.com",
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let creds = credentials(&server.uri());
        let http = HttpClient::new().unwrap();
        let grant = exchange_code(&http, &creds, &creds.redirect_uri, "code-1", "verifier-xyz")
            .await
            .unwrap();

        assert_eq!(grant.access_token, "00D!platform");
        assert_eq!(grant.instance_url, "https://example.my.salesforce.com");
        assert!(grant.expires_in.is_none());
    }

    #[tokio::test]
    async fn test_exchange_code_rejection_carries_provider_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "authentication failure"
            })))
            .mount(&server)
            .await;

        let creds = credentials(&server.uri());
        let http = HttpClient::new().unwrap();
        let err = exchange_code(&http, &creds, &creds.redirect_uri, "bad", "v")
            .await
            .unwrap_err();

        match err {
            DataCloudError::Auth { details: Some(body), .. } => assert_eq!(body["error"], "invalid_grant"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_token_grant_debug_redacts_token() {
        let grant = TokenGrant {
            access_token: "00D!secret".into(),
            instance_url: "https://acme.my.salesforce.com".into(),
            expires_in: None,
            issued_at: Utc::now(),
        };
        let printed = format!("{:?}", grant);
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("00D!secret"));
    }
}
