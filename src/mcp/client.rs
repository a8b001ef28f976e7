//! HTTP client for the Tasklane REST API.
//!
//! Every request carries the bearer token from [`TokenStore`], read at call
//! time so a token saved by `auth complete` is picked up immediately.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::auth::TokenStore;
use crate::models::{ApiErrorBody, DataEnvelope};

/// Where users go when they hit their plan's rate limit.
pub const UPGRADE_URL: &str = "https://tasklane.io/pricing";

/// API client errors, one variant per error kind surfaced to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {message}")]
    Unprocessable {
        message: String,
        errors: Option<Value>,
    },

    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        limit: Option<u64>,
        remaining: Option<u64>,
        reset: Option<u64>,
    },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },

    #[error("Cannot reach the Tasklane API at {url}")]
    NetworkUnreachable { url: String },

    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "validation",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Unprocessable { .. } => "unprocessable",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::Server { .. } => "server_error",
            ApiError::NetworkUnreachable { .. } => "network_unreachable",
            ApiError::Unexpected { .. } | ApiError::Decode(_) | ApiError::Http(_) => "http_error",
        }
    }

    /// Build the error for a non-2xx response.
    pub fn from_status(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .filter(|m| !m.is_empty())
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        match status {
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(format!(
                "{} - re-authenticate with the auth tool (action: login)",
                message
            )),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable {
                message,
                errors: parsed.errors,
            },
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
                message,
                limit: header_u64(headers, "x-ratelimit-limit"),
                remaining: header_u64(headers, "x-ratelimit-remaining"),
                reset: header_u64(headers, "x-ratelimit-reset"),
            },
            s if s.is_server_error() => ApiError::Server {
                status: s.as_u16(),
                message,
            },
            s => ApiError::Unexpected {
                status: s.as_u16(),
                message,
            },
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Query parameters; `None` values are dropped.
pub type Query<'a> = [(&'a str, Option<String>)];

/// HTTP client for the Tasklane API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    tokens: TokenStore,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: TokenStore, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Build an authenticated request. Fails without I/O when no token is available.
    fn request(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
    ) -> Result<(reqwest::RequestBuilder, String), ApiError> {
        let token = self.tokens.get_token().ok_or_else(|| {
            ApiError::Unauthorized(
                "Not authenticated - use the auth tool with action 'login' or set TASKLANE_API_TOKEN"
                    .to_string(),
            )
        })?;

        let url = format!("{}{}", self.base_url, path);
        let params: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();

        let mut req = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json");
        if !params.is_empty() {
            req = req.query(&params);
        }
        Ok((req, url))
    }

    async fn send(&self, req: reqwest::RequestBuilder, url: &str) -> Result<Value, ApiError> {
        let response = req.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                tracing::warn!("Tasklane API unreachable at {}: {}", url, e);
                ApiError::NetworkUnreachable {
                    url: url.to_string(),
                }
            } else {
                ApiError::Http(e)
            }
        })?;
        self.handle_response(response).await
    }

    /// Handle response, converting HTTP errors to ApiError. Empty bodies (204) become `null`.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&body)?);
        }

        let err = ApiError::from_status(status, &headers, &body);
        tracing::debug!("API returned {}: {}", status, err);
        Err(err)
    }

    // ============================================================
    // Verbs
    // ============================================================

    pub async fn get(&self, path: &str, query: &Query<'_>) -> Result<Value, ApiError> {
        let (req, url) = self.request(Method::GET, path, query)?;
        self.send(req, &url).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let (req, url) = self.request(Method::POST, path, &[])?;
        self.send(req.json(body), &url).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let (req, url) = self.request(Method::PUT, path, &[])?;
        self.send(req.json(body), &url).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let (req, url) = self.request(Method::DELETE, path, &[])?;
        self.send(req, &url).await
    }

    /// GET and decode the `data` field of the response envelope.
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T, ApiError> {
        let value = self.get(path, query).await?;
        let envelope: DataEnvelope<T> = serde_json::from_value(value)?;
        Ok(envelope.data)
    }
}
