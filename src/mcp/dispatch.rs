//! Action dispatch and response envelopes shared by every tool.
//!
//! Each tool defines an action enum implementing [`ToolAction`]. [`execute`]
//! parses the raw action string, runs the handler and turns its `Result`
//! into a tool response, so a remote failure never becomes a protocol error.

use std::future::Future;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use super::client::{ApiError, UPGRADE_URL};
use super::resolve::ResolveError;
use crate::auth::{DeviceFlowError, StoreError};

/// A tool's set of actions.
pub trait ToolAction: Sized + Copy + 'static {
    /// Tool name as registered with MCP.
    const TOOL: &'static str;
    /// Every action, in the order they are listed to callers.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str().eq_ignore_ascii_case(raw))
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|action| action.as_str()).collect()
    }
}

/// Anything a tool handler can fail with.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    DeviceFlow(#[from] DeviceFlowError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation",
            ToolError::Api(e) => e.kind(),
            ToolError::DeviceFlow(e) => e.kind(),
            ToolError::Store(_) => "storage_error",
            ToolError::Resolve(ResolveError::NotFound { .. }) => "not_found",
        }
    }

    /// `{error, message, ...}` body for the error envelope.
    pub fn to_envelope(&self) -> Value {
        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });

        match self {
            ToolError::Api(ApiError::Unprocessable {
                errors: Some(errors),
                ..
            }) => {
                body["errors"] = errors.clone();
            }
            ToolError::Api(ApiError::RateLimited {
                limit,
                remaining,
                reset,
                ..
            }) => {
                body["limit"] = json!(limit);
                body["remaining"] = json!(remaining);
                body["reset"] = json!(reset);
                body["upgrade_url"] = json!(UPGRADE_URL);
            }
            ToolError::Resolve(ResolveError::NotFound {
                needle, available, ..
            }) => {
                body["requested"] = json!(needle);
                body["available"] = json!(available);
            }
            _ => {}
        }

        body
    }
}

/// Validation error for a missing field.
pub fn required(field: &str) -> ToolError {
    ToolError::Validation(format!("Missing required field: {}", field))
}

/// A non-empty, trimmed field value or a [`required`] error.
pub fn require<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ToolError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| required(field))
}

/// Identifiers a follow-up call will likely need again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyContext {
    pub company_slug: String,
    pub project_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_slug: Option<String>,
}

/// A successful handler result.
#[derive(Debug, Clone)]
pub struct Reply {
    pub body: Value,
    pub context: Option<ReplyContext>,
}

impl Reply {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            context: None,
        }
    }

    pub fn with_context(mut self, context: ReplyContext) -> Self {
        self.context = Some(context);
        self
    }

    fn into_result(self) -> CallToolResult {
        match serde_json::to_string_pretty(&self.body) {
            Ok(text) => success(text, self.context.as_ref()),
            Err(e) => error("internal_error", &e.to_string()),
        }
    }
}

/// Success envelope, with an optional trailing context block.
pub fn success(json_text: String, context: Option<&ReplyContext>) -> CallToolResult {
    let mut content = vec![Content::text(json_text)];
    if let Some(context) = context {
        if let Ok(ctx) = serde_json::to_string(context) {
            content.push(Content::text(format!("Context: {}", ctx)));
        }
    }
    CallToolResult::success(content)
}

/// Error envelope `{error: kind, message}` flagged as an error result.
pub fn error(kind: &str, message: &str) -> CallToolResult {
    error_value(&json!({ "error": kind, "message": message }))
}

fn error_value(body: &Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
    CallToolResult::error(vec![Content::text(text)])
}

/// Parse the raw action string for tool `A`.
pub fn parse_action<A: ToolAction>(raw: Option<&str>) -> Result<A, ToolError> {
    let raw = require(raw, "action")?;
    A::parse(raw).ok_or_else(|| {
        ToolError::Validation(format!(
            "Unknown action '{}' for tool '{}'. Valid actions: {}",
            raw,
            A::TOOL,
            A::names().join(", ")
        ))
    })
}

/// Parse the action, run the handler and wrap whatever comes back.
pub async fn execute<A, F, Fut>(raw_action: Option<&str>, handler: F) -> CallToolResult
where
    A: ToolAction,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<Reply, ToolError>>,
{
    let action = match parse_action::<A>(raw_action) {
        Ok(action) => action,
        Err(err) => {
            tracing::debug!(tool = A::TOOL, "Rejected action: {}", err);
            return error_value(&err.to_envelope());
        }
    };

    tracing::debug!(tool = A::TOOL, action = action.as_str(), "Executing action");
    match handler(action).await {
        Ok(reply) => reply.into_result(),
        Err(err) => {
            tracing::warn!(
                tool = A::TOOL,
                action = action.as_str(),
                kind = err.kind(),
                "Action failed: {}",
                err
            );
            error_value(&err.to_envelope())
        }
    }
}
