//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers for one session are serialized through `SessionLocks`.

pub mod handlers;
mod session_locks;

pub use handlers::{
    AcceptOfferCommand, AcceptOfferHandler, AcceptOfferResult, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, DeclineOfferCommand, DeclineOfferHandler,
    DeclineOfferResult, GetSessionHandler, GetSessionQuery, JoinMode, JoinSessionCommand,
    JoinSessionHandler, JoinSessionResult, NegotiationHandlers, SubmitOfferCommand,
    SubmitOfferHandler, SubmitOfferResult,
};
pub use session_locks::{SessionGuard, SessionLocks};
