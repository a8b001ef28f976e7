use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend identifier: numeric for most entities, opaque strings for some.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

/// One row of an enumeration endpoint (columns, labels, task types,
/// efforts, sprints, user stories).
///
/// Only the fields needed to translate a human label into an ID are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: ItemId,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl ItemRef {
    pub fn new(id: impl Into<ItemId>, title: &str) -> Self {
        Self {
            id: id.into(),
            title: Some(title.to_string()),
            slug: None,
        }
    }

    /// Human-facing name: title if present, otherwise slug, otherwise the id.
    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.slug.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// A hit from `GET /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    /// App path of the hit, e.g. `/acme/projects/api-v2`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Workspace + project slugs a project-scoped call needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContext {
    pub company_slug: String,
    pub project_slug: String,
}

impl ResolvedContext {
    pub fn new(company_slug: impl Into<String>, project_slug: impl Into<String>) -> Self {
        Self {
            company_slug: company_slug.into(),
            project_slug: project_slug.into(),
        }
    }

    /// API path prefix for this project: `/{company}/projects/{project}`.
    pub fn project_path(&self) -> String {
        format!("/{}/projects/{}", self.company_slug, self.project_slug)
    }
}
