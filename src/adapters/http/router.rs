//! Top-level router composition.

use std::sync::Arc;

use axum::{middleware, Router};
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, Gateway, RoomManager, WebSocketState};
use crate::application::NegotiationHandlers;
use crate::ports::SessionValidator;

use super::health::health_routes;
use super::middleware::auth_middleware;
use super::negotiation::negotiation_routes;

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct AppState {
    pub handlers: NegotiationHandlers,
    pub rooms: Arc<RoomManager>,
    pub validator: Arc<dyn SessionValidator>,
}

/// Builds the full application router.
///
/// - `GET /`, `GET /health`
/// - `/api/negotiations/*` (authenticated)
/// - `GET /ws` (authenticated WebSocket upgrade)
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let gateway = Arc::new(Gateway::new(state.handlers.clone(), state.rooms.clone()));

    let api = negotiation_routes(state.handlers).layer(middleware::from_fn_with_state(
        state.validator.clone(),
        auth_middleware,
    ));

    Router::new()
        .merge(health_routes(state.rooms))
        .nest("/api/negotiations", api)
        .merge(websocket_router(WebSocketState::new(gateway), state.validator))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}
