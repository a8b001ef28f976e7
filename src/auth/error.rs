//! Auth error types.

use thiserror::Error;

/// Errors raised by the OAuth device flow.
#[derive(Debug, Error)]
pub enum DeviceFlowError {
    /// The device code expired before the user approved it.
    ///
    /// The user has to start the login again.
    #[error("Device code expired - run the login again: {0}")]
    Expired(String),

    /// The user declined the authorization request in the browser.
    #[error("Authorization was denied: {0}")]
    AccessDenied(String),

    /// The authorization server answered with any other error code.
    #[error("Device authorization failed: {0}")]
    Rejected(String),

    /// No HTTP status was ever received (DNS failure, connection refused, timeout).
    #[error("Cannot reach the authorization server at {url}")]
    NetworkUnreachable { url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl DeviceFlowError {
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceFlowError::Expired(_) => "expired",
            DeviceFlowError::AccessDenied(_) => "access_denied",
            DeviceFlowError::Rejected(_) => "device_flow_error",
            DeviceFlowError::NetworkUnreachable { .. } => "network_unreachable",
            DeviceFlowError::Http(_) => "http_error",
        }
    }
}

/// Errors raised while persisting token files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not determine home directory for token storage")]
    NoConfigDir,

    #[error("Token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
