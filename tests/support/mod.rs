//! Shared helpers: an in-process mock Tasklane backend and tool-result accessors.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use rmcp::model::CallToolResult;
use serde_json::Value;

use tasklane_mcp::mcp::AppContext;
use tasklane_mcp::Config;

/// A mock backend bound to an ephemeral port that counts every request it sees.
pub struct MockBackend {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockBackend {
    pub async fn start(router: Router) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = router.layer(middleware::from_fn_with_state(hits.clone(), count_hits));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend crashed");
        });

        Self {
            url: format!("http://{}", addr),
            hits,
        }
    }

    /// A backend with no routes: every request is a 404, but still counted.
    pub async fn empty() -> Self {
        Self::start(Router::new()).await
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn count_hits(State(hits): State<Arc<AtomicUsize>>, req: Request, next: Next) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

/// Context pointing both the API and the OAuth host at `url`.
pub fn context(url: &str, config_dir: &Path, env_token: Option<&str>) -> AppContext {
    AppContext::new(&Config {
        api_url: url.to_string(),
        auth_url: url.to_string(),
        env_token: env_token.map(str::to_string),
        config_dir: Some(config_dir.to_path_buf()),
    })
}

pub fn text(result: &CallToolResult, index: usize) -> String {
    result.content[index]
        .as_text()
        .expect("Expected text content")
        .text
        .clone()
}

/// First content block parsed as JSON.
pub fn body(result: &CallToolResult) -> Value {
    serde_json::from_str(&text(result, 0)).expect("Expected JSON in first content block")
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

/// Assert an error envelope of `kind` and return its body.
pub fn expect_error(result: &CallToolResult, kind: &str) -> Value {
    assert!(is_error(result), "Expected error result, got {:?}", result);
    let body = body(result);
    assert_eq!(body["error"], kind, "Unexpected error body: {}", body);
    body
}
