//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `negotiation` - Session/offer state machine, policy and events

pub mod foundation;
pub mod negotiation;
