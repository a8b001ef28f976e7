use super::{page_query, project_context, project_reply};
use crate::mcp::actions::ProjectAction;
use crate::mcp::dispatch::{require, Reply, ToolError};
use crate::mcp::types::ProjectsRequest;
use crate::mcp::AppContext;

pub async fn handle(
    ctx: &AppContext,
    action: ProjectAction,
    req: &ProjectsRequest,
) -> Result<Reply, ToolError> {
    match action {
        ProjectAction::ListCompanies => Ok(Reply::new(ctx.client.get("/companies", &[]).await?)),
        ProjectAction::List => {
            let company = require(req.company_slug.as_deref(), "company_slug")?;
            let body = ctx
                .client
                .get(
                    &format!("/{}/projects", company),
                    &page_query(req.page, req.per_page),
                )
                .await?;
            Ok(Reply::new(body))
        }
        ProjectAction::Get => {
            require(req.project_slug.as_deref(), "project_slug")?;
            let project = project_context(
                ctx,
                req.company_slug.as_deref(),
                req.project_slug.as_deref(),
            )
            .await?;
            let body = ctx.client.get(&project.project_path(), &[]).await?;
            Ok(project_reply(body, &project))
        }
        ProjectAction::Search => {
            let query = require(req.query.as_deref(), "query")?;
            let body = ctx
                .client
                .get(
                    "/search",
                    &[
                        ("q", Some(query.to_string())),
                        ("type", Some("projects".to_string())),
                    ],
                )
                .await?;
            Ok(Reply::new(body))
        }
    }
}
