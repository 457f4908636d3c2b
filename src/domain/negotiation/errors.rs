//! Negotiation-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, ValidationError};

/// Typed rejection returned by every negotiation command.
///
/// A rejected command never leaves a partial mutation behind.
#[derive(Debug, Clone, Error)]
pub enum NegotiationError {
    /// Malformed input (bad amount, empty identifier, missing field).
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Offer id did not resolve within the session (including ids that
    /// are not well-formed).
    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    #[error("Offer already processed: {0}")]
    OfferAlreadyProcessed(String),

    #[error("Session is closed: {0}")]
    SessionClosed(SessionId),

    #[error("Participants cannot accept their own offer")]
    SelfAcceptance,

    /// Transient persistence failure; the caller may resubmit.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl NegotiationError {
    pub fn session_not_found(id: &SessionId) -> Self {
        NegotiationError::SessionNotFound(id.clone())
    }

    pub fn offer_not_found(id: impl Into<String>) -> Self {
        NegotiationError::OfferNotFound(id.into())
    }

    pub fn already_processed(id: impl Into<String>) -> Self {
        NegotiationError::OfferAlreadyProcessed(id.into())
    }

    pub fn session_closed(id: &SessionId) -> Self {
        NegotiationError::SessionClosed(id.clone())
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        NegotiationError::StoreUnavailable(message.into())
    }

    /// Stable machine-readable code sent to clients.
    pub fn wire_code(&self) -> &'static str {
        match self {
            NegotiationError::Validation(_) => "VALIDATION_FAILED",
            NegotiationError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            NegotiationError::OfferNotFound(_) => "OFFER_NOT_FOUND",
            NegotiationError::OfferAlreadyProcessed(_) => "OFFER_ALREADY_PROCESSED",
            NegotiationError::SessionClosed(_) => "SESSION_CLOSED",
            NegotiationError::SelfAcceptance => "SELF_ACCEPTANCE_FORBIDDEN",
            NegotiationError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Message shown to the client that issued the command.
    ///
    /// Infrastructure details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            NegotiationError::Validation(err) => err.to_string(),
            NegotiationError::SessionNotFound(_) => "Session not found.".to_string(),
            NegotiationError::OfferNotFound(_) => "Offer not found.".to_string(),
            NegotiationError::OfferAlreadyProcessed(_) => "Offer already processed.".to_string(),
            NegotiationError::SessionClosed(_) => "Negotiation has already ended.".to_string(),
            NegotiationError::SelfAcceptance => "You cannot accept your own offer.".to_string(),
            NegotiationError::StoreUnavailable(_) => {
                "Request failed, please try again.".to_string()
            }
        }
    }
}

impl From<DomainError> for NegotiationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => NegotiationError::Validation(
                ValidationError::invalid_format("request", err.message),
            ),
            _ => NegotiationError::StoreUnavailable(err.to_string()),
        }
    }
}
