//! Local token storage.
//!
//! Two independent files live in the config directory:
//! - `mcp-token.json` - `{token, savedAt}`
//! - `pending-auth.json` - `{device_code, created_at, expires_at}` (epoch millis)
//!
//! The directory is created 0700 and each file written 0600 on Unix.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use crate::Config;

const TOKEN_FILE: &str = "mcp-token.json";
const PENDING_FILE: &str = "pending-auth.json";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// A device code waiting for the user to approve it in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuth {
    pub device_code: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// Where the active token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    File,
    None,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Environment => "environment",
            TokenSource::File => "file",
            TokenSource::None => "none",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: Option<PathBuf>,
    env_token: Option<String>,
}

impl TokenStore {
    pub fn new(dir: Option<PathBuf>, env_token: Option<String>) -> Self {
        Self {
            dir,
            env_token: env_token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.resolved_config_dir(), config.env_token.clone())
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    // ============================================================
    // Token
    // ============================================================

    /// The bearer token to use: environment first, then the token file.
    ///
    /// A missing or unreadable file is reported as no token.
    pub fn get_token(&self) -> Option<String> {
        if let Some(ref token) = self.env_token {
            return Some(token.clone());
        }
        self.read_token_file()
    }

    pub fn token_source(&self) -> TokenSource {
        if self.env_token.is_some() {
            TokenSource::Environment
        } else if self.read_token_file().is_some() {
            TokenSource::File
        } else {
            TokenSource::None
        }
    }

    pub fn save_token(&self, token: &str) -> Result<(), StoreError> {
        let path = self.path(TOKEN_FILE)?;
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        write_private(&path, &serde_json::to_string_pretty(&stored)?)?;
        tracing::info!("Saved token to {}", path.display());
        Ok(())
    }

    pub fn clear_token(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.path(TOKEN_FILE)?)
    }

    fn read_token_file(&self) -> Option<String> {
        let path = self.dir.as_ref()?.join(TOKEN_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!("Ignoring unreadable token file {}: {}", path.display(), e);
                }
                return None;
            }
        };
        match serde_json::from_str::<StoredToken>(&contents) {
            Ok(stored) if !stored.token.is_empty() => Some(stored.token),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Ignoring corrupt token file {}: {}", path.display(), e);
                None
            }
        }
    }

    // ============================================================
    // Pending device code
    // ============================================================

    pub fn save_pending_device_code(
        &self,
        device_code: &str,
        expires_in_secs: u64,
    ) -> Result<PendingAuth, StoreError> {
        self.save_pending_device_code_at(device_code, expires_in_secs, now_millis())
    }

    /// Same as [`save_pending_device_code`](Self::save_pending_device_code) with an explicit clock.
    pub fn save_pending_device_code_at(
        &self,
        device_code: &str,
        expires_in_secs: u64,
        now_ms: i64,
    ) -> Result<PendingAuth, StoreError> {
        let pending = PendingAuth {
            device_code: device_code.to_string(),
            created_at: now_ms,
            expires_at: expiry_millis(now_ms, expires_in_secs),
        };
        let path = self.path(PENDING_FILE)?;
        write_private(&path, &serde_json::to_string_pretty(&pending)?)?;
        Ok(pending)
    }

    pub fn get_pending_device_code(&self) -> Option<PendingAuth> {
        self.get_pending_device_code_at(now_millis())
    }

    /// Read the pending code as of `now_ms`.
    ///
    /// A code is valid up to and including `expires_at`; once past it the
    /// file is removed and `None` is returned.
    pub fn get_pending_device_code_at(&self, now_ms: i64) -> Option<PendingAuth> {
        let path = self.dir.as_ref()?.join(PENDING_FILE);
        let contents = fs::read_to_string(&path).ok()?;
        let pending: PendingAuth = match serde_json::from_str(&contents) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::debug!("Ignoring corrupt pending auth file: {}", e);
                return None;
            }
        };

        if now_ms > pending.expires_at {
            tracing::debug!("Pending device code expired, removing {}", path.display());
            if let Err(e) = remove_if_exists(&path) {
                tracing::warn!("Failed to remove expired pending auth file: {}", e);
            }
            return None;
        }

        Some(pending)
    }

    pub fn clear_pending_device_code(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.path(PENDING_FILE)?)
    }

    fn path(&self, file: &str) -> Result<PathBuf, StoreError> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(file))
            .ok_or(StoreError::NoConfigDir)
    }
}

/// `now_ms + expires_in_secs` in millis, saturating at `i64::MAX`.
fn expiry_millis(now_ms: i64, expires_in_secs: u64) -> i64 {
    i64::try_from(expires_in_secs)
        .ok()
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(|ms| now_ms.checked_add(ms))
        .unwrap_or(i64::MAX)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn write_private(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        create_private_dir(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;

    // mode() only applies on creation
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

fn create_private_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
