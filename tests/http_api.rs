//! Integration tests for the HTTP surface.
//!
//! The full router is built the way the binary builds it, with a mock
//! credential validator standing in for JWT verification.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use dealroom::adapters::http::{build_router, AppState};
use dealroom::adapters::{InMemorySessionStore, JwtSessionValidator, MockSessionValidator, RoomManager};
use dealroom::application::NegotiationHandlers;
use dealroom::domain::foundation::{AuthenticatedUser, UserId};
use dealroom::domain::negotiation::NegotiationPolicy;
use dealroom::ports::SessionValidator;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(validator: Arc<dyn SessionValidator>) -> Router {
    let store = Arc::new(InMemorySessionStore::new());
    let rooms = Arc::new(RoomManager::with_default_capacity());
    let handlers = NegotiationHandlers::new(store, rooms.clone(), NegotiationPolicy::default());
    build_router(
        AppState {
            handlers,
            rooms,
            validator,
        },
        &[],
    )
}

fn app() -> Router {
    app_with(Arc::new(
        MockSessionValidator::new()
            .with_test_user("token-a", "user-a", "Alice")
            .with_test_user("token-b", "user-b", "Bob"),
    ))
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// REST
// =============================================================================

#[tokio::test]
async fn create_then_join_then_read_session() {
    let app = app();

    let created = app
        .clone()
        .oneshot(post("/api/negotiations/create", Some("token-a"), json!({})))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let created = json_body(created).await;
    assert_eq!(created["msg"], "Negotiation session created");
    let session_id = created["sessionId"].as_str().unwrap().to_string();

    let joined = app
        .clone()
        .oneshot(post(
            "/api/negotiations/join",
            Some("token-b"),
            json!({"sessionId": session_id}),
        ))
        .await
        .unwrap();
    assert_eq!(joined.status(), StatusCode::OK);
    assert_eq!(json_body(joined).await["msg"], "Joined negotiation session");

    let snapshot = app
        .oneshot(get(&format!("/api/negotiations/{}", session_id), Some("token-a")))
        .await
        .unwrap();
    assert_eq!(snapshot.status(), StatusCode::OK);
    let snapshot = json_body(snapshot).await;
    assert_eq!(snapshot["status"], "active");
    assert_eq!(snapshot["participants"], json!(["user-a", "user-b"]));
    assert_eq!(snapshot["offers"], json!([]));
}

#[tokio::test]
async fn joining_unknown_session_is_404() {
    let response = app()
        .oneshot(post(
            "/api/negotiations/join",
            Some("token-a"),
            json!({"sessionId": "missing"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["msg"], "Negotiation session not found");
}

#[tokio::test]
async fn joining_with_blank_session_id_is_400() {
    let response = app()
        .oneshot(post(
            "/api/negotiations/join",
            Some("token-a"),
            json!({"sessionId": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reading_unknown_session_is_404() {
    let response = app()
        .oneshot(get("/api/negotiations/nope", Some("token-a")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rest_requires_a_credential() {
    let response = app()
        .oneshot(post("/api/negotiations/create", None, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app()
        .oneshot(post("/api/negotiations/create", Some("bogus"), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["code"], "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn jwt_issued_tokens_are_accepted() {
    let validator = JwtSessionValidator::new(
        b"integration-test-secret-that-is-long-enough",
        0,
        std::time::Duration::from_secs(60),
    );
    let token = validator
        .issue(&AuthenticatedUser::new(UserId::new("user-a").unwrap(), "Alice"))
        .unwrap();
    let app = app_with(Arc::new(validator));

    let response = app
        .oneshot(post("/api/negotiations/create", Some(&token), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// WebSocket handshake and health
// =============================================================================

#[tokio::test]
async fn websocket_without_token_is_refused() {
    let request = Request::builder()
        .uri("/ws")
        .header(header::CONNECTION, "upgrade")
        .header(header::UPGRADE, "websocket")
        .header(header::SEC_WEBSOCKET_VERSION, "13")
        .header(header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ==")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn websocket_with_invalid_token_is_refused() {
    let request = Request::builder()
        .uri("/ws?token=bogus")
        .header(header::CONNECTION, "upgrade")
        .header(header::UPGRADE, "websocket")
        .header(header::SEC_WEBSOCKET_VERSION, "13")
        .header(header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ==")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let response = app().oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}
