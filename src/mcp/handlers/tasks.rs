use serde_json::{json, Value};

use super::{lookup_id, lookup_optional, page_query, project_context, reply_context};
use crate::mcp::actions::TaskAction;
use crate::mcp::dispatch::{require, Reply, ToolError};
use crate::mcp::types::TasksRequest;
use crate::mcp::AppContext;
use crate::models::{ItemId, MoveTaskInput, ResolvedContext, TaskInput};

pub async fn handle(
    ctx: &AppContext,
    action: TaskAction,
    req: &TasksRequest,
) -> Result<Reply, ToolError> {
    match action {
        TaskAction::List => list(ctx, req).await,
        TaskAction::Get => {
            let task_slug = require(req.task_slug.as_deref(), "task_slug")?;
            let project = resolve(ctx, req).await?;
            let body = ctx.client.get(&task_path(&project, task_slug), &[]).await?;
            Ok(task_reply(body, &project, Some(task_slug)))
        }
        TaskAction::Create => {
            let title = require(req.title.as_deref(), "title")?;
            let project = resolve(ctx, req).await?;

            let mut input = task_input(ctx, &project, req).await?;
            input.title = Some(title.to_string());

            let body = ctx
                .client
                .post(&format!("{}/tasks", project.project_path()), &input)
                .await?;
            let created_slug = body
                .pointer("/data/slug")
                .and_then(Value::as_str)
                .map(str::to_string);
            tracing::info!(
                "Created task {} in {}",
                created_slug.as_deref().unwrap_or("?"),
                project.project_path()
            );
            Ok(task_reply(body, &project, created_slug.as_deref()))
        }
        TaskAction::Update => {
            let task_slug = require(req.task_slug.as_deref(), "task_slug")?;
            if !has_update_fields(req) {
                return Err(ToolError::Validation(
                    "Nothing to update: provide at least one of title, description, column, labels, sprint, user_story, task_type, effort, assignee, due_date"
                        .to_string(),
                ));
            }
            let project = resolve(ctx, req).await?;

            let mut input = task_input(ctx, &project, req).await?;
            input.title = req.title.clone();

            let body = ctx
                .client
                .put(&task_path(&project, task_slug), &input)
                .await?;
            Ok(task_reply(body, &project, Some(task_slug)))
        }
        TaskAction::Move => {
            let task_slug = require(req.task_slug.as_deref(), "task_slug")?;
            let column = require(req.column.as_deref(), "column")?;
            let project = resolve(ctx, req).await?;

            let column_id = lookup_id(ctx, &project, "column", "columns", column).await?;
            let body = ctx
                .client
                .post(
                    &format!("{}/move", task_path(&project, task_slug)),
                    &MoveTaskInput {
                        column_id,
                        position: req.position,
                    },
                )
                .await?;
            Ok(task_reply(body, &project, Some(task_slug)))
        }
        TaskAction::Delete => {
            let task_slug = require(req.task_slug.as_deref(), "task_slug")?;
            let project = resolve(ctx, req).await?;
            ctx.client.delete(&task_path(&project, task_slug)).await?;
            tracing::info!("Deleted task {} in {}", task_slug, project.project_path());
            Ok(Reply::new(json!({ "deleted": true, "task_slug": task_slug }))
                .with_context(reply_context(&project, None)))
        }
    }
}

async fn list(ctx: &AppContext, req: &TasksRequest) -> Result<Reply, ToolError> {
    let project = resolve(ctx, req).await?;

    let column_id = lookup_optional(ctx, &project, "column", "columns", req.column.as_deref()).await?;
    let label_ids = lookup_labels(ctx, &project, req).await?;
    let sprint_id = lookup_optional(ctx, &project, "sprint", "sprints", req.sprint.as_deref()).await?;

    let mut query = vec![
        ("column_id", column_id.map(|id| id.to_string())),
        ("sprint_id", sprint_id.map(|id| id.to_string())),
        ("assignee", req.assignee.clone()),
    ];
    // Repeated `label_id` params: tasks carrying any of the labels
    query.extend(label_ids.iter().map(|id| ("label_id", Some(id.to_string()))));
    query.extend(page_query(req.page, req.per_page));

    let body = ctx
        .client
        .get(&format!("{}/tasks", project.project_path()), &query)
        .await?;
    Ok(task_reply(body, &project, None))
}

async fn resolve(ctx: &AppContext, req: &TasksRequest) -> Result<ResolvedContext, ToolError> {
    project_context(ctx, req.company_slug.as_deref(), req.project_slug.as_deref()).await
}

/// Translate every human-readable reference on the request into IDs.
async fn task_input(
    ctx: &AppContext,
    project: &ResolvedContext,
    req: &TasksRequest,
) -> Result<TaskInput, ToolError> {
    let label_ids = lookup_labels(ctx, project, req).await?;

    Ok(TaskInput {
        title: None,
        description: req.description.clone(),
        column_id: lookup_optional(ctx, project, "column", "columns", req.column.as_deref()).await?,
        label_ids,
        sprint_id: lookup_optional(ctx, project, "sprint", "sprints", req.sprint.as_deref()).await?,
        user_story_id: lookup_optional(ctx, project, "user story", "user-stories", req.user_story.as_deref())
            .await?,
        task_type_id: lookup_optional(ctx, project, "task type", "task-types", req.task_type.as_deref())
            .await?,
        effort_id: lookup_optional(ctx, project, "effort", "efforts", req.effort.as_deref()).await?,
        assignee: req.assignee.clone(),
        due_date: req.due_date.clone(),
    })
}

/// Every requested label translated to its ID, blanks skipped.
async fn lookup_labels(
    ctx: &AppContext,
    project: &ResolvedContext,
    req: &TasksRequest,
) -> Result<Vec<ItemId>, ToolError> {
    let mut label_ids = Vec::new();
    for label in req.labels.iter().flatten() {
        let label = label.trim();
        if !label.is_empty() {
            label_ids.push(lookup_id(ctx, project, "label", "labels", label).await?);
        }
    }
    Ok(label_ids)
}

fn has_update_fields(req: &TasksRequest) -> bool {
    [
        &req.title,
        &req.description,
        &req.column,
        &req.sprint,
        &req.user_story,
        &req.task_type,
        &req.effort,
        &req.assignee,
        &req.due_date,
    ]
    .iter()
    .any(|field| field.is_some())
        || req.labels.as_ref().is_some_and(|labels| !labels.is_empty())
}

fn task_path(project: &ResolvedContext, task_slug: &str) -> String {
    format!("{}/tasks/{}", project.project_path(), task_slug)
}

fn task_reply(body: Value, project: &ResolvedContext, task_slug: Option<&str>) -> Reply {
    Reply::new(body).with_context(reply_context(project, task_slug))
}
