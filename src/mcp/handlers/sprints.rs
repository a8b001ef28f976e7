use super::{project_context, project_reply};
use crate::mcp::actions::SprintAction;
use crate::mcp::dispatch::{require, Reply, ToolError};
use crate::mcp::types::SprintsRequest;
use crate::mcp::AppContext;
use crate::models::{ResolvedContext, SprintInput};

pub async fn handle(
    ctx: &AppContext,
    action: SprintAction,
    req: &SprintsRequest,
) -> Result<Reply, ToolError> {
    match action {
        SprintAction::List => {
            let project = resolve(ctx, req).await?;
            let body = ctx.client.get(&sprints_path(&project), &[]).await?;
            Ok(project_reply(body, &project))
        }
        SprintAction::Get => {
            let slug = require(req.sprint_slug.as_deref(), "sprint_slug")?;
            let project = resolve(ctx, req).await?;
            let body = ctx
                .client
                .get(&format!("{}/{}", sprints_path(&project), slug), &[])
                .await?;
            Ok(project_reply(body, &project))
        }
        SprintAction::Create => {
            require(req.title.as_deref(), "title")?;
            let project = resolve(ctx, req).await?;
            let body = ctx
                .client
                .post(&sprints_path(&project), &sprint_input(req))
                .await?;
            Ok(project_reply(body, &project))
        }
        SprintAction::Update => {
            let slug = require(req.sprint_slug.as_deref(), "sprint_slug")?;
            let project = resolve(ctx, req).await?;
            let body = ctx
                .client
                .put(&format!("{}/{}", sprints_path(&project), slug), &sprint_input(req))
                .await?;
            Ok(project_reply(body, &project))
        }
    }
}

async fn resolve(ctx: &AppContext, req: &SprintsRequest) -> Result<ResolvedContext, ToolError> {
    project_context(ctx, req.company_slug.as_deref(), req.project_slug.as_deref()).await
}

fn sprints_path(project: &ResolvedContext) -> String {
    format!("{}/sprints", project.project_path())
}

fn sprint_input(req: &SprintsRequest) -> SprintInput {
    SprintInput {
        title: req.title.clone(),
        goal: req.goal.clone(),
        starts_at: req.starts_at.clone(),
        ends_at: req.ends_at.clone(),
    }
}
