//! Request types for MCP tools.
//!
//! Every field except `action` is optional at the schema level; which ones an
//! action needs is checked by its handler so a missing one comes back as a
//! validation error naming the field.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;

// ============================================================
// Auth
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AuthRequest {
    #[schemars(description = "One of: login, complete, status, logout")]
    pub action: Option<String>,
    #[schemars(
        description = "Device code to poll with (complete only). Defaults to the code saved by the last login."
    )]
    pub device_code: Option<String>,
}

// ============================================================
// Projects
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ProjectsRequest {
    #[schemars(description = "One of: list_companies, list, get, search")]
    pub action: Option<String>,
    #[schemars(description = "Workspace slug (list, get). Resolved from project_slug when omitted on get.")]
    pub company_slug: Option<String>,
    #[schemars(description = "Project slug or name (get)")]
    pub project_slug: Option<String>,
    #[schemars(description = "Free-text query (search)")]
    pub query: Option<String>,
    #[schemars(description = "Page number for list results")]
    pub page: Option<u32>,
    #[schemars(description = "Results per page for list results")]
    pub per_page: Option<u32>,
}

// ============================================================
// Tasks
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TasksRequest {
    #[schemars(description = "One of: list, get, create, update, move, delete")]
    pub action: Option<String>,
    #[schemars(description = "Workspace slug. Optional when project_slug is unambiguous.")]
    pub company_slug: Option<String>,
    #[schemars(description = "Project slug or name")]
    pub project_slug: Option<String>,
    #[schemars(description = "Task slug (get, update, move, delete)")]
    pub task_slug: Option<String>,
    #[schemars(description = "Task title (create, update)")]
    pub title: Option<String>,
    #[schemars(description = "Task description in markdown (create, update)")]
    pub description: Option<String>,
    #[schemars(description = "Column title, e.g. 'In Progress' (create, update, move; filter on list)")]
    pub column: Option<String>,
    #[schemars(description = "Label titles to apply (create, update) or to filter by, matching any (list)")]
    pub labels: Option<Vec<String>>,
    #[schemars(description = "Sprint slug or title (create, update; filter on list)")]
    pub sprint: Option<String>,
    #[schemars(description = "User story slug or title (create, update)")]
    pub user_story: Option<String>,
    #[schemars(description = "Task type title, e.g. 'Bug' (create, update)")]
    pub task_type: Option<String>,
    #[schemars(description = "Effort title, e.g. 'Medium' (create, update)")]
    pub effort: Option<String>,
    #[schemars(description = "Assignee username or email (create, update; filter on list)")]
    pub assignee: Option<String>,
    #[schemars(description = "Due date as YYYY-MM-DD (create, update)")]
    pub due_date: Option<String>,
    #[schemars(description = "Position within the target column (move)")]
    pub position: Option<u32>,
    #[schemars(description = "Page number (list)")]
    pub page: Option<u32>,
    #[schemars(description = "Results per page (list)")]
    pub per_page: Option<u32>,
}

// ============================================================
// Board metadata
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct BoardRequest {
    #[schemars(
        description = "One of: list_columns, list_labels, create_label, list_task_types, list_efforts"
    )]
    pub action: Option<String>,
    #[schemars(description = "Workspace slug. Optional when project_slug is unambiguous.")]
    pub company_slug: Option<String>,
    #[schemars(description = "Project slug or name")]
    pub project_slug: Option<String>,
    #[schemars(description = "Label title (create_label)")]
    pub title: Option<String>,
    #[schemars(
        description = "Label colour as hex (e.g. '3b82f6') or a name: blue, red, green, yellow, orange, purple, pink, gray, teal, indigo, black, white"
    )]
    pub color: Option<String>,
}

// ============================================================
// Sprints
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SprintsRequest {
    #[schemars(description = "One of: list, get, create, update")]
    pub action: Option<String>,
    #[schemars(description = "Workspace slug. Optional when project_slug is unambiguous.")]
    pub company_slug: Option<String>,
    #[schemars(description = "Project slug or name")]
    pub project_slug: Option<String>,
    #[schemars(description = "Sprint slug (get, update)")]
    pub sprint_slug: Option<String>,
    #[schemars(description = "Sprint title (create, update)")]
    pub title: Option<String>,
    #[schemars(description = "What the sprint should achieve (create, update)")]
    pub goal: Option<String>,
    #[schemars(description = "Start date as YYYY-MM-DD (create, update)")]
    pub starts_at: Option<String>,
    #[schemars(description = "End date as YYYY-MM-DD (create, update)")]
    pub ends_at: Option<String>,
}

// ============================================================
// User stories
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UserStoriesRequest {
    #[schemars(description = "One of: list, get, create")]
    pub action: Option<String>,
    #[schemars(description = "Workspace slug. Optional when project_slug is unambiguous.")]
    pub company_slug: Option<String>,
    #[schemars(description = "Project slug or name")]
    pub project_slug: Option<String>,
    #[schemars(description = "User story slug (get)")]
    pub user_story_slug: Option<String>,
    #[schemars(description = "Story title, e.g. 'As a user I can reset my password' (create)")]
    pub title: Option<String>,
    #[schemars(description = "Acceptance criteria and details (create)")]
    pub description: Option<String>,
}
