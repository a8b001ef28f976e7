//! OAuth 2.0 Device Authorization Grant (RFC 8628) client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::error::DeviceFlowError;

/// Client identifier registered with the Tasklane authorization server.
pub const CLIENT_ID: &str = "tasklane-mcp";

/// Grant type string for device-code token requests.
pub const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Extra delay added to the poll interval on `slow_down` (RFC 8628 §3.5).
pub const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Response from `POST /oauth/device/code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl DeviceCode {
    /// The URL to show the user, preferring the one with the code pre-filled.
    pub fn verification_url(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }
}

/// Successful token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Error body per RFC 6749 §5.2.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl OAuthErrorBody {
    fn describe(&self) -> String {
        self.error_description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| self.error.clone())
    }
}

#[derive(Debug, Serialize)]
struct DeviceCodeRequest<'a> {
    client_id: &'a str,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    device_code: &'a str,
    grant_type: &'a str,
}

/// Outcome of a single token poll.
#[derive(Debug, Clone)]
pub enum PollStatus {
    /// The user approved the request.
    Authorized(TokenResponse),
    /// `authorization_pending`: poll again after the interval.
    Pending,
    /// `slow_down`: poll again with the interval increased by [`SLOW_DOWN_STEP`].
    SlowDown,
}

#[derive(Debug, Clone)]
pub struct DeviceAuthClient {
    http_client: Client,
    auth_url: String,
}

impl DeviceAuthClient {
    /// `auth_url` is the authorization host, e.g. `https://tasklane.io`.
    pub fn new(http_client: Client, auth_url: impl Into<String>) -> Self {
        Self {
            http_client,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn code_url(&self) -> String {
        format!("{}/oauth/device/code", self.auth_url)
    }

    fn token_url(&self) -> String {
        format!("{}/oauth/device/token", self.auth_url)
    }

    /// Start a device login.
    pub async fn request_device_code(&self) -> Result<DeviceCode, DeviceFlowError> {
        let url = self.code_url();
        tracing::debug!("Requesting device code from {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&DeviceCodeRequest {
                client_id: CLIENT_ID,
            })
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| transport_error(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<OAuthErrorBody>(&body) {
                Ok(err) => err.describe(),
                Err(_) => format!("HTTP {}", status),
            };
            return Err(DeviceFlowError::Rejected(message));
        }

        Ok(response.json().await?)
    }

    /// Poll the token endpoint once.
    ///
    /// Returns `Pending` / `SlowDown` while the user has not approved yet,
    /// `Authorized` once they have, and `Err` for every other error code.
    pub async fn poll_for_token(&self, device_code: &str) -> Result<PollStatus, DeviceFlowError> {
        let url = self.token_url();

        let response = self
            .http_client
            .post(&url)
            .json(&TokenRequest {
                client_id: CLIENT_ID,
                device_code,
                grant_type: DEVICE_GRANT_TYPE,
            })
            .timeout(Duration::from_secs(15))
            .send()
            .await
            .map_err(|e| transport_error(e, &url))?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            if let Ok(token) = serde_json::from_str::<TokenResponse>(&body) {
                return Ok(PollStatus::Authorized(token));
            }
        }

        // Pending and slow_down arrive as 400 with an error body.
        let err: OAuthErrorBody = serde_json::from_str(&body).map_err(|_| {
            DeviceFlowError::Rejected(format!("HTTP {}: unexpected token response", status))
        })?;

        match err.error.as_str() {
            "authorization_pending" => Ok(PollStatus::Pending),
            "slow_down" => Ok(PollStatus::SlowDown),
            "expired_token" => Err(DeviceFlowError::Expired(err.describe())),
            "access_denied" => Err(DeviceFlowError::AccessDenied(err.describe())),
            _ => {
                let description = err.describe();
                if description.contains("expired") {
                    Err(DeviceFlowError::Expired(description))
                } else {
                    Err(DeviceFlowError::Rejected(description))
                }
            }
        }
    }

    /// Poll until the user approves, the code expires, or an error occurs.
    ///
    /// Waits `interval` seconds between polls and backs off on `slow_down`.
    /// Drop the future to cancel.
    pub async fn wait_for_token(&self, code: &DeviceCode) -> Result<TokenResponse, DeviceFlowError> {
        // Absurd lifetimes from the server mean no deadline at all
        let deadline = Instant::now().checked_add(Duration::from_secs(code.expires_in));
        let mut interval = Duration::from_secs(code.interval.max(1));

        loop {
            tokio::time::sleep(interval).await;
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(DeviceFlowError::Expired(
                    "device code expired before authorization".to_string(),
                ));
            }

            match self.poll_for_token(&code.device_code).await? {
                PollStatus::Authorized(token) => return Ok(token),
                PollStatus::Pending => {}
                PollStatus::SlowDown => {
                    interval += SLOW_DOWN_STEP;
                    tracing::debug!("Server asked to slow down, polling every {:?}", interval);
                }
            }
        }
    }
}

fn transport_error(e: reqwest::Error, url: &str) -> DeviceFlowError {
    if e.is_connect() || e.is_timeout() {
        tracing::warn!("Authorization server unreachable at {}: {}", url, e);
        DeviceFlowError::NetworkUnreachable {
            url: url.to_string(),
        }
    } else {
        DeviceFlowError::Http(e)
    }
}
