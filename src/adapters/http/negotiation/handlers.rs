//! HTTP handlers for negotiation endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    CreateSessionCommand, GetSessionQuery, JoinMode, JoinSessionCommand, NegotiationHandlers,
};
use crate::domain::foundation::SessionId;
use crate::domain::negotiation::NegotiationError;

use super::dto::{ErrorResponse, JoinSessionRequest, SessionCommandResponse, SessionResponse};

/// POST /api/negotiations/create - Create a session with a generated id
pub async fn create_negotiation(
    State(handlers): State<NegotiationHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers.create.handle(CreateSessionCommand { user }).await {
        Ok(result) => Json(SessionCommandResponse {
            msg: "Negotiation session created".to_string(),
            session_id: result.session.id().to_string(),
        })
        .into_response(),
        Err(e) => handle_negotiation_error(e),
    }
}

/// POST /api/negotiations/join - Join an existing session
pub async fn join_negotiation(
    State(handlers): State<NegotiationHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<JoinSessionRequest>,
) -> Response {
    let session_id = match SessionId::new(req.session_id) {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    let cmd = JoinSessionCommand {
        session_id,
        user,
        mode: JoinMode::ExistingOnly,
    };

    match handlers.join.handle(cmd).await {
        Ok(result) => Json(SessionCommandResponse {
            msg: "Joined negotiation session".to_string(),
            session_id: result.session.id().to_string(),
        })
        .into_response(),
        Err(e) => handle_negotiation_error(e),
    }
}

/// GET /api/negotiations/:session_id - Session snapshot
pub async fn get_negotiation(
    State(handlers): State<NegotiationHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response()
        }
    };

    match handlers.get.handle(GetSessionQuery { session_id }).await {
        Ok(session) => Json(SessionResponse::from(&session)).into_response(),
        Err(e) => handle_negotiation_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_negotiation_error(error: NegotiationError) -> Response {
    let status = match &error {
        NegotiationError::Validation(_) => StatusCode::BAD_REQUEST,
        NegotiationError::SessionNotFound(_) | NegotiationError::OfferNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        NegotiationError::OfferAlreadyProcessed(_) | NegotiationError::SessionClosed(_) => {
            StatusCode::CONFLICT
        }
        NegotiationError::SelfAcceptance => StatusCode::FORBIDDEN,
        NegotiationError::StoreUnavailable(detail) => {
            tracing::error!("Negotiation request failed: {}", detail);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let msg = match &error {
        NegotiationError::SessionNotFound(_) => "Negotiation session not found".to_string(),
        NegotiationError::StoreUnavailable(_) => "Server error".to_string(),
        other => other.user_message(),
    };

    (status, Json(ErrorResponse::new(error.wire_code(), msg))).into_response()
}
