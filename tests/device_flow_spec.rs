//! OAuth device flow against a mock authorization server.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use support::MockBackend;
use tasklane_mcp::auth::{
    DeviceAuthClient, DeviceCode, DeviceFlowError, PollStatus, CLIENT_ID, DEVICE_GRANT_TYPE,
};

fn device_code_body() -> Value {
    json!({
        "device_code": "dc-123",
        "user_code": "ABCD-EFGH",
        "verification_uri": "https://tasklane.test/device",
        "verification_uri_complete": "https://tasklane.test/device?code=ABCD-EFGH",
        "expires_in": 900,
        "interval": 5
    })
}

/// Token endpoint answering every poll with the given OAuth error code.
async fn token_error_backend(code: &'static str) -> MockBackend {
    MockBackend::start(Router::new().route(
        "/oauth/device/token",
        post(move || async move {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": code, "error_description": format!("{} from server", code) })),
            )
        }),
    ))
    .await
}

fn client(url: &str) -> DeviceAuthClient {
    DeviceAuthClient::new(reqwest::Client::new(), url)
}

mod request_device_code {
    use super::*;

    #[tokio::test]
    async fn returns_the_device_code_and_sends_the_client_id() {
        let backend = MockBackend::start(Router::new().route(
            "/oauth/device/code",
            post(|Json(body): Json<Value>| async move {
                if body["client_id"] != CLIENT_ID {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_client" })));
                }
                (StatusCode::OK, Json(device_code_body()))
            }),
        ))
        .await;

        let code = client(&backend.url)
            .request_device_code()
            .await
            .expect("Device code request failed");

        assert_eq!(code.device_code, "dc-123");
        assert_eq!(code.user_code, "ABCD-EFGH");
        assert_eq!(code.expires_in, 900);
        assert_eq!(code.interval, 5);
        assert_eq!(
            code.verification_url(),
            "https://tasklane.test/device?code=ABCD-EFGH"
        );
    }

    #[tokio::test]
    async fn surfaces_the_error_description_on_rejection() {
        let backend = MockBackend::start(Router::new().route(
            "/oauth/device/code",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid_client", "error_description": "Unknown client" })),
                )
            }),
        ))
        .await;

        let err = client(&backend.url)
            .request_device_code()
            .await
            .expect_err("Expected rejection");

        match err {
            DeviceFlowError::Rejected(message) => assert_eq!(message, "Unknown client"),
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn reports_network_unreachable_with_the_target_url() {
        // Nothing listens on port 1
        let err = client("http://127.0.0.1:1")
            .request_device_code()
            .await
            .expect_err("Expected a transport failure");

        assert_eq!(err.kind(), "network_unreachable");
        match err {
            DeviceFlowError::NetworkUnreachable { url } => {
                assert_eq!(url, "http://127.0.0.1:1/oauth/device/code")
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }
}

mod poll_for_token {
    use super::*;

    #[tokio::test]
    async fn returns_authorized_with_the_token_and_sends_the_device_grant() {
        let backend = MockBackend::start(Router::new().route(
            "/oauth/device/token",
            post(|Json(body): Json<Value>| async move {
                if body["grant_type"] != DEVICE_GRANT_TYPE || body["device_code"] != "dc-123" {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" })));
                }
                (
                    StatusCode::OK,
                    Json(json!({ "access_token": "tok-1", "token_type": "Bearer" })),
                )
            }),
        ))
        .await;

        let status = client(&backend.url)
            .poll_for_token("dc-123")
            .await
            .expect("Poll failed");

        match status {
            PollStatus::Authorized(token) => assert_eq!(token.access_token, "tok-1"),
            other => panic!("Expected Authorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn returns_pending_not_an_error_while_authorization_is_pending() {
        let backend = token_error_backend("authorization_pending").await;

        let status = client(&backend.url).poll_for_token("dc-123").await;

        assert!(matches!(status, Ok(PollStatus::Pending)));
    }

    #[tokio::test]
    async fn returns_slow_down_not_an_error() {
        let backend = token_error_backend("slow_down").await;

        let status = client(&backend.url).poll_for_token("dc-123").await;

        assert!(matches!(status, Ok(PollStatus::SlowDown)));
    }

    #[tokio::test]
    async fn fails_with_access_denied() {
        let backend = token_error_backend("access_denied").await;

        let err = client(&backend.url)
            .poll_for_token("dc-123")
            .await
            .expect_err("Expected access_denied");

        assert!(matches!(err, DeviceFlowError::AccessDenied(_)));
        assert!(err.to_string().contains("access_denied from server"));
    }

    #[tokio::test]
    async fn fails_with_expired_on_expired_token() {
        let backend = token_error_backend("expired_token").await;

        let err = client(&backend.url)
            .poll_for_token("dc-123")
            .await
            .expect_err("Expected expiry");

        assert_eq!(err.kind(), "expired");
    }

    #[tokio::test]
    async fn propagates_other_error_descriptions() {
        let backend = token_error_backend("invalid_grant").await;

        let err = client(&backend.url)
            .poll_for_token("dc-123")
            .await
            .expect_err("Expected failure");

        match err {
            DeviceFlowError::Rejected(message) => assert_eq!(message, "invalid_grant from server"),
            other => panic!("Unexpected error: {:?}", other),
        }
    }
}

mod wait_for_token {
    use super::*;

    fn short_code(expires_in: u64) -> DeviceCode {
        DeviceCode {
            device_code: "dc-123".to_string(),
            user_code: "ABCD-EFGH".to_string(),
            verification_uri: "https://tasklane.test/device".to_string(),
            verification_uri_complete: None,
            expires_in,
            interval: 1,
        }
    }

    #[tokio::test]
    async fn polls_until_the_user_approves() {
        let polls = Arc::new(AtomicUsize::new(0));
        let backend = MockBackend::start(
            Router::new()
                .route(
                    "/oauth/device/token",
                    post(|State(polls): State<Arc<AtomicUsize>>| async move {
                        if polls.fetch_add(1, Ordering::SeqCst) < 2 {
                            (
                                StatusCode::BAD_REQUEST,
                                Json(json!({ "error": "authorization_pending" })),
                            )
                        } else {
                            (StatusCode::OK, Json(json!({ "access_token": "tok-1" })))
                        }
                    }),
                )
                .with_state(polls.clone()),
        )
        .await;

        let token = client(&backend.url)
            .wait_for_token(&short_code(60))
            .await
            .expect("Login failed");

        assert_eq!(token.access_token, "tok-1");
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn tolerates_an_absurd_expiry_from_the_server() {
        let backend = MockBackend::start(Router::new().route(
            "/oauth/device/token",
            post(|| async { Json(json!({ "access_token": "tok-1" })) }),
        ))
        .await;

        let token = client(&backend.url)
            .wait_for_token(&short_code(u64::MAX))
            .await
            .expect("Login failed");

        assert_eq!(token.access_token, "tok-1");
    }

    #[tokio::test]
    async fn gives_up_once_the_code_expires() {
        let backend = token_error_backend("authorization_pending").await;

        let err = client(&backend.url)
            .wait_for_token(&short_code(1))
            .await
            .expect_err("Expected expiry");

        assert!(matches!(err, DeviceFlowError::Expired(_)));
    }

    #[tokio::test]
    async fn stops_on_access_denied() {
        let backend = token_error_backend("access_denied").await;

        let err = client(&backend.url)
            .wait_for_token(&short_code(60))
            .await
            .expect_err("Expected denial");

        assert!(matches!(err, DeviceFlowError::AccessDenied(_)));
        assert_eq!(backend.hits(), 1);
    }
}
