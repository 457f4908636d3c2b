//! HTTP routes for negotiation endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::application::NegotiationHandlers;

use super::handlers::{create_negotiation, get_negotiation, join_negotiation};

/// Creates the negotiation router, mounted at `/api/negotiations`.
pub fn negotiation_routes(handlers: NegotiationHandlers) -> Router {
    Router::new()
        .route("/create", post(create_negotiation))
        .route("/join", post(join_negotiation))
        .route("/:session_id", get(get_negotiation))
        .with_state(handlers)
}
