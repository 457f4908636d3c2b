//! HTTP DTOs for negotiation endpoints.
//!
//! These types decouple the HTTP API from domain types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionStatus, Timestamp, UserId};
use crate::domain::negotiation::{NegotiationSession, OfferView};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to join an existing session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionRequest {
    pub session_id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for create/join.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCommandResponse {
    pub msg: String,
    pub session_id: String,
}

/// Snapshot of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub participants: Vec<UserId>,
    pub offers: Vec<OfferView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&NegotiationSession> for SessionResponse {
    fn from(session: &NegotiationSession) -> Self {
        Self {
            session_id: session.id().to_string(),
            status: session.status(),
            participants: session.participants().to_vec(),
            offers: session.offer_views(),
            created_at: *session.created_at(),
            updated_at: *session.updated_at(),
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", msg)
    }
}
