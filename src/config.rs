//! Process configuration read from the environment.
//!
//! - `TASKLANE_API_URL` - REST API base URL (default: `https://api.tasklane.io/v1`)
//! - `TASKLANE_AUTH_URL` - OAuth host for the device flow (default: `https://tasklane.io`)
//! - `TASKLANE_API_TOKEN` - bearer token, overrides the stored token file
//! - `TASKLANE_CONFIG_DIR` - where token files live (default: `~/.tasklane`)

use std::path::PathBuf;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.tasklane.io/v1";

/// Default OAuth host.
pub const DEFAULT_AUTH_URL: &str = "https://tasklane.io";

/// Directory name under `$HOME` holding the token files.
pub const CONFIG_DIR_NAME: &str = ".tasklane";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub auth_url: String,
    pub env_token: Option<String>,
    pub config_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env_non_empty("TASKLANE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: env_non_empty("TASKLANE_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            env_token: env_non_empty("TASKLANE_API_TOKEN"),
            config_dir: env_non_empty("TASKLANE_CONFIG_DIR").map(PathBuf::from),
        }
    }

    /// Resolve the token directory, falling back to `~/.tasklane`.
    pub fn resolved_config_dir(&self) -> Option<PathBuf> {
        self.config_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME)))
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
