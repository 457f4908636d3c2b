//! Liveness endpoints.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::adapters::websocket::RoomManager;

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub connections: usize,
    pub active_sessions: usize,
}

/// Routes: `GET /` and `GET /health`.
pub fn health_routes(rooms: Arc<RoomManager>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(rooms)
}

async fn root() -> &'static str {
    "api running"
}

async fn health(State(rooms): State<Arc<RoomManager>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: rooms.connection_count().await,
        active_sessions: rooms.active_rooms().await.len(),
    })
}
