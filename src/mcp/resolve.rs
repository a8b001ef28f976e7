//! Translating what an agent knows (names, titles, slugs) into what the API
//! wants (workspace/project slugs and backend IDs).

use thiserror::Error;

use super::client::{ApiClient, ApiError};
use crate::models::{ItemId, ItemRef, ResolvedContext, SearchHit};

/// A human label that matched nothing in its enumeration.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No {kind} named '{needle}'. Available: {}", .available.join(", "))]
    NotFound {
        kind: &'static str,
        needle: String,
        available: Vec<String>,
    },
}

/// Fill in workspace and project slugs.
///
/// Both present: returned as-is. Only the project: searched for and parsed
/// out of the hit's path. `Ok(None)` when it cannot be resolved.
pub async fn resolve_project_context(
    client: &ApiClient,
    company_slug: Option<&str>,
    project_slug: Option<&str>,
) -> Result<Option<ResolvedContext>, ApiError> {
    let company_slug = company_slug.filter(|s| !s.is_empty());
    let Some(project_slug) = project_slug.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Some(company_slug) = company_slug {
        return Ok(Some(ResolvedContext::new(company_slug, project_slug)));
    }

    let hits: Vec<SearchHit> = client
        .get_data(
            "/search",
            &[
                ("q", Some(project_slug.to_string())),
                ("type", Some("projects".to_string())),
            ],
        )
        .await?;

    let resolved = pick_search_hit(&hits, project_slug)
        .and_then(|hit| hit.path.as_deref())
        .and_then(parse_project_path);

    match resolved {
        Some(ref ctx) => tracing::debug!(
            "Resolved project '{}' to {}/{}",
            project_slug,
            ctx.company_slug,
            ctx.project_slug
        ),
        None => tracing::debug!("Could not resolve project '{}'", project_slug),
    }

    Ok(resolved)
}

/// First hit whose title equals `project` ignoring case, else the first hit.
pub fn pick_search_hit<'a>(hits: &'a [SearchHit], project: &str) -> Option<&'a SearchHit> {
    hits.iter()
        .find(|hit| same_name(&hit.title, project))
        .or_else(|| hits.first())
}

/// Parse `/{company_slug}/projects/{project_slug}[/...]`.
pub fn parse_project_path(path: &str) -> Option<ResolvedContext> {
    let mut segments = path.trim_start_matches('/').split('/');
    let company = segments.next().filter(|s| !s.is_empty())?;
    if segments.next()? != "projects" {
        return None;
    }
    let project = segments.next().filter(|s| !s.is_empty())?;
    Some(ResolvedContext::new(company, project))
}

/// Find the ID of the item whose title (or slug) equals `needle`, ignoring case.
pub fn resolve_label_like_id<'a>(
    kind: &'static str,
    needle: &str,
    items: &'a [ItemRef],
) -> Result<&'a ItemId, ResolveError> {
    let needle = needle.trim();
    let matches =
        |candidate: &Option<String>| candidate.as_deref().is_some_and(|c| same_name(c, needle));

    items
        .iter()
        .find(|item| matches(&item.title))
        .or_else(|| items.iter().find(|item| matches(&item.slug)))
        .map(|item| &item.id)
        .ok_or_else(|| ResolveError::NotFound {
            kind,
            needle: needle.to_string(),
            available: items.iter().map(ItemRef::label).collect(),
        })
}

/// Names compare trimmed and Unicode case-folded.
fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Named colours accepted for labels.
const PALETTE: &[(&str, &str)] = &[
    ("blue", "#3b82f6"),
    ("red", "#ef4444"),
    ("green", "#22c55e"),
    ("yellow", "#eab308"),
    ("orange", "#f97316"),
    ("purple", "#a855f7"),
    ("pink", "#ec4899"),
    ("gray", "#6b7280"),
    ("grey", "#6b7280"),
    ("teal", "#14b8a6"),
    ("indigo", "#6366f1"),
    ("black", "#000000"),
    ("white", "#ffffff"),
];

/// Hex (`#rrggbb` or `rrggbb`) or a palette name to `#rrggbb`.
/// Anything else is passed through for the API to judge.
pub fn normalize_color(input: &str) -> String {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return format!("#{}", hex.to_ascii_lowercase());
    }

    PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, hex)| hex.to_string())
        .unwrap_or_else(|| input.to_string())
}
