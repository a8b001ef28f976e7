use super::{project_context, project_reply};
use crate::mcp::actions::UserStoryAction;
use crate::mcp::dispatch::{require, Reply, ToolError};
use crate::mcp::types::UserStoriesRequest;
use crate::mcp::AppContext;
use crate::models::{ResolvedContext, UserStoryInput};

pub async fn handle(
    ctx: &AppContext,
    action: UserStoryAction,
    req: &UserStoriesRequest,
) -> Result<Reply, ToolError> {
    match action {
        UserStoryAction::List => {
            let project = resolve(ctx, req).await?;
            let body = ctx.client.get(&stories_path(&project), &[]).await?;
            Ok(project_reply(body, &project))
        }
        UserStoryAction::Get => {
            let slug = require(req.user_story_slug.as_deref(), "user_story_slug")?;
            let project = resolve(ctx, req).await?;
            let body = ctx
                .client
                .get(&format!("{}/{}", stories_path(&project), slug), &[])
                .await?;
            Ok(project_reply(body, &project))
        }
        UserStoryAction::Create => {
            let title = require(req.title.as_deref(), "title")?;
            let project = resolve(ctx, req).await?;
            let input = UserStoryInput {
                title: title.to_string(),
                description: req.description.clone(),
            };
            let body = ctx.client.post(&stories_path(&project), &input).await?;
            Ok(project_reply(body, &project))
        }
    }
}

async fn resolve(ctx: &AppContext, req: &UserStoriesRequest) -> Result<ResolvedContext, ToolError> {
    project_context(ctx, req.company_slug.as_deref(), req.project_slug.as_deref()).await
}

fn stories_path(project: &ResolvedContext) -> String {
    format!("{}/user-stories", project.project_path())
}
