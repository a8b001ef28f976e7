//! MCP server exposing the Tasklane API as action-dispatch tools.

pub mod actions;
pub mod client;
pub mod dispatch;
pub mod handlers;
pub mod resolve;
mod types;

pub use client::{ApiClient, ApiError};
pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};

use crate::auth::{DeviceAuthClient, TokenStore};
use crate::Config;
use actions::*;

/// Everything a handler needs, built once per process.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub client: ApiClient,
    pub device: DeviceAuthClient,
}

impl AppContext {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::new();
        let tokens = TokenStore::from_config(config);
        Self {
            client: ApiClient::new(config.api_url.clone(), tokens, http.clone()),
            device: DeviceAuthClient::new(http, config.auth_url.clone()),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        self.client.tokens()
    }
}

#[derive(Clone)]
pub struct McpServer {
    ctx: AppContext,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }
}

#[tool_router]
impl McpServer {
    #[tool(
        description = "Log in to Tasklane with the OAuth device flow. Actions: 'login' starts a login and returns a verification_url and user_code for the user to confirm in a browser; 'complete' checks once whether the user approved (returns status 'authorization_pending' until then, 'authenticated' when done) - call it again after the returned interval; 'status' reports whether a valid token is present; 'logout' removes the stored token."
    )]
    pub async fn auth(
        &self,
        params: Parameters<AuthRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(dispatch::execute(req.action.as_deref(), |action: AuthAction| {
            handlers::auth::handle(&self.ctx, action, &req)
        })
        .await)
    }

    #[tool(
        description = "Browse workspaces and projects. Actions: 'list_companies' lists workspaces you belong to; 'list' lists projects in company_slug; 'get' returns one project (company_slug is looked up from project_slug when omitted); 'search' finds projects by free-text query."
    )]
    pub async fn projects(
        &self,
        params: Parameters<ProjectsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(dispatch::execute(req.action.as_deref(), |action: ProjectAction| {
            handlers::projects::handle(&self.ctx, action, &req)
        })
        .await)
    }

    #[tool(
        description = "Manage tasks on a project board. Actions: list, get, create, update, move, delete. Refer to columns, labels, task types and efforts by title and to sprints and user stories by slug or title - they are translated to IDs for you. Responses end with a Context block holding the company_slug/project_slug/task_slug to reuse in follow-up calls."
    )]
    pub async fn tasks(
        &self,
        params: Parameters<TasksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(dispatch::execute(req.action.as_deref(), |action: TaskAction| {
            handlers::tasks::handle(&self.ctx, action, &req)
        })
        .await)
    }

    #[tool(
        description = "Read board metadata for a project. Actions: list_columns, list_labels, list_task_types, list_efforts, create_label (title plus optional color as hex or a name like 'blue')."
    )]
    pub async fn board(
        &self,
        params: Parameters<BoardRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(dispatch::execute(req.action.as_deref(), |action: BoardAction| {
            handlers::board::handle(&self.ctx, action, &req)
        })
        .await)
    }

    #[tool(
        description = "Manage sprints in a project. Actions: list, get (sprint_slug), create (title, optional goal/starts_at/ends_at), update (sprint_slug plus fields to change)."
    )]
    pub async fn sprints(
        &self,
        params: Parameters<SprintsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(dispatch::execute(req.action.as_deref(), |action: SprintAction| {
            handlers::sprints::handle(&self.ctx, action, &req)
        })
        .await)
    }

    #[tool(
        description = "Manage user stories in a project. Actions: list, get (user_story_slug), create (title, optional description)."
    )]
    pub async fn user_stories(
        &self,
        params: Parameters<UserStoriesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(dispatch::execute(req.action.as_deref(), |action: UserStoryAction| {
            handlers::user_stories::handle(&self.ctx, action, &req)
        })
        .await)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "tasklane-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"Tasklane project boards for AI agents.

Every tool takes an "action" plus the fields that action needs. Missing
fields come back as a validation error naming them.

AUTHENTICATION:
1. auth {action: "login"} - show the user the verification_url and user_code
2. auth {action: "complete"} - repeat every few seconds until status is "authenticated"
If any call returns error "unauthorized", log in again.

CONTEXT:
- Project-scoped calls need company_slug and project_slug. If you only know
  the project, pass project_slug alone and the workspace is looked up.
- Successful responses end with a "Context:" block. Reuse those slugs in
  the next call instead of asking the user again.

NAMES, NOT IDS:
- Pass column, label, task type and effort titles ("In Progress", "Bug").
- Pass sprint and user story slugs or titles.
- Lookups ignore case. An unknown name returns error "not_found" with the
  available options listed."#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(ctx: AppContext) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio against {}", ctx.client.base_url());

    let service = McpServer::new(ctx);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
