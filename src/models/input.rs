use serde::{Deserialize, Serialize};

use super::ItemId;

/// Body for creating or updating a task. Unset fields are omitted so
/// updates only touch what was provided.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub label_ids: Vec<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_story_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTaskInput {
    pub column_id: ItemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SprintInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStoryInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
