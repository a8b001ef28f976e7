//! `auth` tool: device login driven by the caller, one poll per `complete`.

use serde_json::{json, Value};

use crate::auth::{DeviceFlowError, PollStatus, TokenSource, SLOW_DOWN_STEP};
use crate::mcp::actions::AuthAction;
use crate::mcp::client::ApiError;
use crate::mcp::dispatch::{Reply, ToolError};
use crate::mcp::types::AuthRequest;
use crate::mcp::AppContext;

pub async fn handle(
    ctx: &AppContext,
    action: AuthAction,
    req: &AuthRequest,
) -> Result<Reply, ToolError> {
    match action {
        AuthAction::Login => login(ctx).await,
        AuthAction::Complete => complete(ctx, req.device_code.as_deref()).await,
        AuthAction::Status => status(ctx).await,
        AuthAction::Logout => logout(ctx),
    }
}

async fn login(ctx: &AppContext) -> Result<Reply, ToolError> {
    let code = ctx.device.request_device_code().await?;
    ctx.tokens()
        .save_pending_device_code(&code.device_code, code.expires_in)?;

    tracing::info!("Device login started, code expires in {}s", code.expires_in);

    Ok(Reply::new(json!({
        "status": "pending",
        "verification_url": code.verification_url(),
        "user_code": code.user_code,
        "expires_in": code.expires_in,
        "interval": code.interval,
        "message": format!(
            "Open {} in a browser and confirm code {}. Then call auth with action 'complete', waiting at least {} seconds between calls.",
            code.verification_url(),
            code.user_code,
            code.interval
        ),
    })))
}

async fn complete(ctx: &AppContext, explicit_code: Option<&str>) -> Result<Reply, ToolError> {
    let explicit_code = explicit_code.map(str::trim).filter(|c| !c.is_empty());
    let pending = ctx.tokens().get_pending_device_code();

    let device_code = match (explicit_code, &pending) {
        (Some(code), Some(pending)) => {
            if pending.device_code != code {
                tracing::warn!("Explicit device_code differs from the pending login; using the explicit one");
            }
            code.to_string()
        }
        (Some(code), None) => code.to_string(),
        (None, Some(pending)) => pending.device_code.clone(),
        (None, None) => {
            return Err(ToolError::Validation(
                "Missing required field: device_code (no pending login found - call auth with action 'login' first)"
                    .to_string(),
            ))
        }
    };

    match ctx.device.poll_for_token(&device_code).await {
        Ok(PollStatus::Pending) => Ok(Reply::new(json!({
            "status": "authorization_pending",
            "message": "Waiting for the user to approve the login in the browser. Call complete again shortly.",
        }))),
        Ok(PollStatus::SlowDown) => Ok(Reply::new(json!({
            "status": "slow_down",
            "message": format!(
                "Polling too fast. Wait at least {} more seconds before calling complete again.",
                SLOW_DOWN_STEP.as_secs()
            ),
        }))),
        Ok(PollStatus::Authorized(token)) => {
            ctx.tokens().save_token(&token.access_token)?;
            ctx.tokens().clear_pending_device_code()?;
            tracing::info!("Device login completed");

            let user = current_user(ctx).await.unwrap_or_else(|e| {
                tracing::warn!("Logged in but failed to fetch the current user: {}", e);
                Value::Null
            });

            Ok(Reply::new(json!({
                "status": "authenticated",
                "user": user,
            })))
        }
        Err(e @ (DeviceFlowError::Expired(_) | DeviceFlowError::AccessDenied(_))) => {
            // Another code failing must not discard the login in progress
            let polled_pending = pending.as_ref().is_some_and(|p| p.device_code == device_code);
            if polled_pending {
                if let Err(clear_err) = ctx.tokens().clear_pending_device_code() {
                    tracing::warn!("Failed to clear pending login: {}", clear_err);
                }
            }
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn status(ctx: &AppContext) -> Result<Reply, ToolError> {
    let source = ctx.tokens().token_source();
    let pending_login = ctx.tokens().get_pending_device_code().is_some();

    if source == TokenSource::None {
        return Ok(Reply::new(json!({
            "authenticated": false,
            "source": source.as_str(),
            "pending_login": pending_login,
            "message": "Not logged in. Call auth with action 'login'.",
        })));
    }

    match current_user(ctx).await {
        Ok(user) => Ok(Reply::new(json!({
            "authenticated": true,
            "source": source.as_str(),
            "user": user,
        }))),
        Err(ApiError::Unauthorized(message)) => Ok(Reply::new(json!({
            "authenticated": false,
            "source": source.as_str(),
            "pending_login": pending_login,
            "message": message,
        }))),
        Err(e) => Err(e.into()),
    }
}

fn logout(ctx: &AppContext) -> Result<Reply, ToolError> {
    ctx.tokens().clear_token()?;
    ctx.tokens().clear_pending_device_code()?;
    tracing::info!("Logged out");

    let message = if ctx.tokens().token_source() == TokenSource::Environment {
        "Stored token removed. TASKLANE_API_TOKEN is still set and will keep being used."
    } else {
        "Logged out."
    };

    Ok(Reply::new(json!({
        "status": "logged_out",
        "message": message,
    })))
}

/// `GET /me`, unwrapped from its `data` envelope when present.
async fn current_user(ctx: &AppContext) -> Result<Value, ApiError> {
    let mut body = ctx.client.get("/me", &[]).await?;
    Ok(match body.get_mut("data") {
        Some(data) => data.take(),
        None => body,
    })
}
