//! Per-tool action handlers.
//!
//! Handlers check required fields first, then resolve context and IDs, then
//! call the API. Nothing touches the network until every required field is
//! present.

pub mod auth;
pub mod board;
pub mod projects;
pub mod sprints;
pub mod tasks;
pub mod user_stories;

use serde_json::Value;

use super::dispatch::{required, Reply, ReplyContext, ToolError};
use super::resolve::{resolve_label_like_id, resolve_project_context};
use super::AppContext;
use crate::models::{ItemId, ItemRef, ResolvedContext};

/// Workspace and project slugs for a project-scoped call, or a validation
/// error naming both.
pub(crate) async fn project_context(
    ctx: &AppContext,
    company_slug: Option<&str>,
    project_slug: Option<&str>,
) -> Result<ResolvedContext, ToolError> {
    resolve_project_context(&ctx.client, company_slug, project_slug)
        .await?
        .ok_or_else(|| required("company_slug and project_slug"))
}

/// Fetch an enumeration endpoint under the project and translate `needle` into an ID.
pub(crate) async fn lookup_id(
    ctx: &AppContext,
    project: &ResolvedContext,
    kind: &'static str,
    endpoint: &str,
    needle: &str,
) -> Result<ItemId, ToolError> {
    let items: Vec<ItemRef> = ctx
        .client
        .get_data(&format!("{}/{}", project.project_path(), endpoint), &[])
        .await?;
    Ok(resolve_label_like_id(kind, needle, &items)?.clone())
}

/// Like [`lookup_id`] but skips the call when nothing was asked for.
pub(crate) async fn lookup_optional(
    ctx: &AppContext,
    project: &ResolvedContext,
    kind: &'static str,
    endpoint: &str,
    needle: Option<&str>,
) -> Result<Option<ItemId>, ToolError> {
    match needle.map(str::trim).filter(|n| !n.is_empty()) {
        Some(needle) => Ok(Some(lookup_id(ctx, project, kind, endpoint, needle).await?)),
        None => Ok(None),
    }
}

pub(crate) fn reply_context(project: &ResolvedContext, task_slug: Option<&str>) -> ReplyContext {
    ReplyContext {
        company_slug: project.company_slug.clone(),
        project_slug: project.project_slug.clone(),
        task_slug: task_slug.map(str::to_string),
    }
}

/// Reply carrying the project it was resolved against.
pub(crate) fn project_reply(body: Value, project: &ResolvedContext) -> Reply {
    Reply::new(body).with_context(reply_context(project, None))
}

pub(crate) fn page_query(page: Option<u32>, per_page: Option<u32>) -> [(&'static str, Option<String>); 2] {
    [
        ("page", page.map(|p| p.to_string())),
        ("per_page", per_page.map(|p| p.to_string())),
    ]
}
