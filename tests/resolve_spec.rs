mod support;

use speculate2::speculate;
use tasklane_mcp::mcp::resolve::*;
use tasklane_mcp::models::{ItemId, ItemRef, ResolvedContext, SearchHit};

fn hit(title: &str, path: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        path: Some(path.to_string()),
        kind: Some("project".to_string()),
    }
}

speculate! {
    describe "parse_project_path" {
        it "extracts workspace and project slugs" {
            assert_eq!(
                parse_project_path("/acme/projects/api-v2"),
                Some(ResolvedContext::new("acme", "api-v2"))
            );
        }

        it "tolerates trailing segments and slashes" {
            assert_eq!(
                parse_project_path("/acme/projects/api-v2/board/"),
                Some(ResolvedContext::new("acme", "api-v2"))
            );
            assert_eq!(
                parse_project_path("acme/projects/api-v2/"),
                Some(ResolvedContext::new("acme", "api-v2"))
            );
        }

        it "rejects malformed paths" {
            assert_eq!(parse_project_path("/acme/tasks/api-v2"), None);
            assert_eq!(parse_project_path("/acme/projects"), None);
            assert_eq!(parse_project_path("/acme/projects/"), None);
            assert_eq!(parse_project_path("//projects/api-v2"), None);
            assert_eq!(parse_project_path(""), None);
        }
    }

    describe "pick_search_hit" {
        it "prefers an exact case-insensitive title match" {
            let hits = vec![
                hit("API v2 Docs", "/acme/projects/api-v2-docs"),
                hit("api-v2", "/acme/projects/api-v2"),
            ];

            let picked = pick_search_hit(&hits, "API-V2").expect("Expected a hit");

            assert_eq!(picked.path.as_deref(), Some("/acme/projects/api-v2"));
        }

        it "folds non-ASCII titles the same way as label lookups" {
            let hits = vec![
                hit("Überblick", "/acme/projects/ueberblick-old"),
                hit("Über", "/acme/projects/ueber"),
            ];

            let picked = pick_search_hit(&hits, "über").expect("Expected a hit");
            let items = vec![ItemRef::new(3, "Über")];

            assert_eq!(picked.path.as_deref(), Some("/acme/projects/ueber"));
            assert!(resolve_label_like_id("label", "über", &items).is_ok());
        }

        it "falls back to the first hit" {
            let hits = vec![
                hit("Website", "/acme/projects/website"),
                hit("Mobile", "/acme/projects/mobile"),
            ];

            let picked = pick_search_hit(&hits, "web").expect("Expected a hit");

            assert_eq!(picked.title, "Website");
        }

        it "returns None for no hits" {
            assert!(pick_search_hit(&[], "web").is_none());
        }
    }

    describe "resolve_label_like_id" {
        it "matches titles ignoring case" {
            let items = vec![ItemRef::new(20, "In Progress")];

            let id = resolve_label_like_id("column", "in progress", &items).expect("Expected a match");

            assert_eq!(id, &ItemId::Number(20));
        }

        it "returns the first match" {
            let items = vec![ItemRef::new(1, "Bug"), ItemRef::new(2, "bug")];

            let id = resolve_label_like_id("task type", "BUG", &items).expect("Expected a match");

            assert_eq!(id, &ItemId::Number(1));
        }

        it "matches slugs when no title matches" {
            let items = vec![ItemRef {
                id: ItemId::Text("spr_9".to_string()),
                title: Some("Sprint 9".to_string()),
                slug: Some("sprint-9".to_string()),
            }];

            let id = resolve_label_like_id("sprint", "Sprint-9", &items).expect("Expected a match");

            assert_eq!(id, &ItemId::Text("spr_9".to_string()));
        }

        it "reports the requested title and the available options" {
            let items = vec![ItemRef::new(1, "Todo"), ItemRef::new(2, "Done")];

            let err = resolve_label_like_id("column", "Doing", &items).expect_err("Expected no match");

            match err {
                ResolveError::NotFound { kind, needle, available } => {
                    assert_eq!(kind, "column");
                    assert_eq!(needle, "Doing");
                    assert_eq!(available, vec!["Todo".to_string(), "Done".to_string()]);
                }
            }
        }
    }

    describe "normalize_color" {
        it "accepts hex with or without a hash" {
            assert_eq!(normalize_color("3B82F6"), "#3b82f6");
            assert_eq!(normalize_color("#ff0000"), "#ff0000");
        }

        it "maps palette names ignoring case" {
            assert_eq!(normalize_color("blue"), "#3b82f6");
            assert_eq!(normalize_color("Red"), "#ef4444");
            assert_eq!(normalize_color("grey"), normalize_color("gray"));
        }

        it "passes unknown values through unchanged" {
            assert_eq!(normalize_color("chartreuse"), "chartreuse");
            assert_eq!(normalize_color("#12345"), "#12345");
        }
    }
}

mod resolve_project_context {
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    use super::support::{context, MockBackend};
    use super::*;

    async fn search_backend(path: &'static str) -> MockBackend {
        MockBackend::start(Router::new().route(
            "/search",
            get(move |Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("type").map(String::as_str), Some("projects"));
                let q = params.get("q").cloned().unwrap_or_default();
                Json(json!({ "data": [{ "title": q, "path": path, "type": "project" }] }))
            }),
        ))
        .await
    }

    #[tokio::test]
    async fn returns_both_slugs_unchanged_without_a_request() {
        let backend = MockBackend::empty().await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ctx = context(&backend.url, dir.path(), Some("token"));

        let resolved = resolve_project_context(&ctx.client, Some("acme"), Some("api-v2"))
            .await
            .expect("Resolution failed");

        assert_eq!(resolved, Some(ResolvedContext::new("acme", "api-v2")));
        assert_eq!(backend.hits(), 0);
    }

    #[tokio::test]
    async fn looks_up_the_workspace_from_the_project() {
        let backend = search_backend("/acme/projects/api-v2").await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ctx = context(&backend.url, dir.path(), Some("token"));

        let resolved = resolve_project_context(&ctx.client, None, Some("api-v2"))
            .await
            .expect("Resolution failed");

        assert_eq!(resolved, Some(ResolvedContext::new("acme", "api-v2")));
        assert_eq!(backend.hits(), 1);
    }

    #[tokio::test]
    async fn is_unresolved_when_the_path_does_not_parse() {
        let backend = search_backend("/acme/settings").await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ctx = context(&backend.url, dir.path(), Some("token"));

        let resolved = resolve_project_context(&ctx.client, None, Some("api-v2"))
            .await
            .expect("Resolution failed");

        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn is_unresolved_when_nothing_matches() {
        let backend = MockBackend::start(Router::new().route(
            "/search",
            get(|| async { Json(json!({ "data": Value::Array(vec![]) })) }),
        ))
        .await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ctx = context(&backend.url, dir.path(), Some("token"));

        let resolved = resolve_project_context(&ctx.client, None, Some("ghost"))
            .await
            .expect("Resolution failed");

        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn is_unresolved_without_a_project() {
        let backend = MockBackend::empty().await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ctx = context(&backend.url, dir.path(), Some("token"));

        let resolved = resolve_project_context(&ctx.client, Some("acme"), None)
            .await
            .expect("Resolution failed");

        assert_eq!(resolved, None);
        assert_eq!(backend.hits(), 0);
    }
}
