//! On-disk token cache.
//!
//! A single JSON file holds the last platform token together with the
//! fingerprint of the credentials it was issued under. A degraded cache is
//! equivalent to a cold start: every read failure is a miss and every write
//! failure is logged and swallowed.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::credentials::Fingerprint;

/// Permission bits applied to the cache file on every write.
#[cfg(unix)]
const CACHE_FILE_MODE: u32 = 0o600;

/// A platform token as persisted in the cache file.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub fingerprint: String,
    pub instance_url: String,
    #[serde(default = "Utc::now")]
    pub issued_at: DateTime<Utc>,
}

impl CachedToken {
    /// Usable only before expiry and under the same credentials.
    pub fn is_valid_for(&self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> bool {
        now < self.expires_at && self.fingerprint == fingerprint.as_str()
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("fingerprint", &self.fingerprint)
            .field("instance_url", &self.instance_url)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Token cache stored at a fixed per-user location.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached token if it is unexpired and matches `fingerprint`.
    pub fn load(&self, fingerprint: &Fingerprint) -> Option<CachedToken> {
        self.load_at(fingerprint, Utc::now())
    }

    pub fn load_at(&self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> Option<CachedToken> {
        let token = self.peek()?;

        if token.fingerprint != fingerprint.as_str() {
            info!("Credential configuration changed, cached token ignored");
            return None;
        }
        if now >= token.expires_at {
            info!("Cached token expired at {}, will re-authenticate", token.expires_at);
            return None;
        }

        debug!("Loaded cached token (valid until {})", token.expires_at);
        Some(token)
    }

    /// Read the cache file without validating it.
    pub fn peek(&self) -> Option<CachedToken> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read token cache {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str::<CachedToken>(&content) {
            Ok(token) if !token.access_token.is_empty() && !token.instance_url.is_empty() => Some(token),
            Ok(_) => {
                warn!("Token cache {:?} is missing required fields", self.path);
                None
            }
            Err(e) => {
                warn!("Failed to parse token cache {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Persist `token`, replacing any previous entry.
    pub fn save(&self, token: &CachedToken) {
        match self.write_atomic(token) {
            Ok(()) => debug!("Saved token to cache {:?}", self.path),
            Err(e) => warn!("Failed to save token to cache {:?}: {}", self.path, e),
        }
    }

    /// Remove the cache file.
    pub fn invalidate(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("Token cache invalidated"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove token cache {:?}: {}", self.path, e),
        }
    }

    fn write_atomic(&self, token: &CachedToken) -> io::Result<()> {
        let payload = serde_json::to_string_pretty(token)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_sibling();
        let written = (|| {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&tmp, fs::Permissions::from_mode(CACHE_FILE_MODE))?;
            }
            file.write_all(payload.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        })();

        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }

    fn temp_sibling(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}
