//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is what the identity provider resolves a credential
//! to. The real-time gateway binds one to each connection for its lifetime.

use super::UserId;
use thiserror::Error;

/// Identity bound to a connection or request after credential verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user identifier from the identity provider.
    pub id: UserId,

    /// Human-readable name shown to other participants.
    pub display_name: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Authentication errors that can occur during credential verification.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No credential was supplied with the request or handshake.
    #[error("No token provided")]
    MissingToken,

    /// The token is malformed or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The identity provider is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
