//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the negotiation domain.

mod auth;
mod errors;
mod ids;
mod offer_status;
mod session_status;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{OfferId, SessionId, UserId, MAX_SESSION_ID_LENGTH};
pub use offer_status::OfferStatus;
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
