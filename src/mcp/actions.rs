//! Action enums, one per tool.

use super::dispatch::ToolAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Complete,
    Status,
    Logout,
}

impl ToolAction for AuthAction {
    const TOOL: &'static str = "auth";
    const ALL: &'static [Self] = &[Self::Login, Self::Complete, Self::Status, Self::Logout];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Complete => "complete",
            Self::Status => "status",
            Self::Logout => "logout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    ListCompanies,
    List,
    Get,
    Search,
}

impl ToolAction for ProjectAction {
    const TOOL: &'static str = "projects";
    const ALL: &'static [Self] = &[Self::ListCompanies, Self::List, Self::Get, Self::Search];

    fn as_str(&self) -> &'static str {
        match self {
            Self::ListCompanies => "list_companies",
            Self::List => "list",
            Self::Get => "get",
            Self::Search => "search",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    List,
    Get,
    Create,
    Update,
    Move,
    Delete,
}

impl ToolAction for TaskAction {
    const TOOL: &'static str = "tasks";
    const ALL: &'static [Self] = &[
        Self::List,
        Self::Get,
        Self::Create,
        Self::Update,
        Self::Move,
        Self::Delete,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Move => "move",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    ListColumns,
    ListLabels,
    CreateLabel,
    ListTaskTypes,
    ListEfforts,
}

impl ToolAction for BoardAction {
    const TOOL: &'static str = "board";
    const ALL: &'static [Self] = &[
        Self::ListColumns,
        Self::ListLabels,
        Self::CreateLabel,
        Self::ListTaskTypes,
        Self::ListEfforts,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::ListColumns => "list_columns",
            Self::ListLabels => "list_labels",
            Self::CreateLabel => "create_label",
            Self::ListTaskTypes => "list_task_types",
            Self::ListEfforts => "list_efforts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprintAction {
    List,
    Get,
    Create,
    Update,
}

impl ToolAction for SprintAction {
    const TOOL: &'static str = "sprints";
    const ALL: &'static [Self] = &[Self::List, Self::Get, Self::Create, Self::Update];

    fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStoryAction {
    List,
    Get,
    Create,
}

impl ToolAction for UserStoryAction {
    const TOOL: &'static str = "user_stories";
    const ALL: &'static [Self] = &[Self::List, Self::Get, Self::Create];

    fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
        }
    }
}
