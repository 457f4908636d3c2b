//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod negotiation;

pub use negotiation::{
    AcceptOfferCommand, AcceptOfferHandler, AcceptOfferResult, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, DeclineOfferCommand, DeclineOfferHandler,
    DeclineOfferResult, GetSessionHandler, GetSessionQuery, JoinMode, JoinSessionCommand,
    JoinSessionHandler, JoinSessionResult, NegotiationHandlers, SubmitOfferCommand,
    SubmitOfferHandler, SubmitOfferResult,
};
