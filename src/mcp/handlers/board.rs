//! `board` tool: the enumerations tasks reference by title.

use super::{project_context, project_reply};
use crate::mcp::actions::BoardAction;
use crate::mcp::dispatch::{require, Reply, ToolError};
use crate::mcp::resolve::normalize_color;
use crate::mcp::types::BoardRequest;
use crate::mcp::AppContext;
use crate::models::LabelInput;

pub async fn handle(
    ctx: &AppContext,
    action: BoardAction,
    req: &BoardRequest,
) -> Result<Reply, ToolError> {
    let endpoint = match action {
        BoardAction::ListColumns => "columns",
        BoardAction::ListLabels => "labels",
        BoardAction::ListTaskTypes => "task-types",
        BoardAction::ListEfforts => "efforts",
        BoardAction::CreateLabel => {
            let title = require(req.title.as_deref(), "title")?;
            let project =
                project_context(ctx, req.company_slug.as_deref(), req.project_slug.as_deref())
                    .await?;
            let input = LabelInput {
                title: title.to_string(),
                color: req.color.as_deref().map(normalize_color),
            };
            let body = ctx
                .client
                .post(&format!("{}/labels", project.project_path()), &input)
                .await?;
            return Ok(project_reply(body, &project));
        }
    };

    let project =
        project_context(ctx, req.company_slug.as_deref(), req.project_slug.as_deref()).await?;
    let body = ctx
        .client
        .get(&format!("{}/{}", project.project_path(), endpoint), &[])
        .await?;
    Ok(project_reply(body, &project))
}
