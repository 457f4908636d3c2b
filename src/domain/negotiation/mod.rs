//! Negotiation domain module.
//!
//! The offer/counter-offer state machine. A session collects offers from
//! its participants; each offer is accepted or declined exactly once, and
//! the first acceptance completes the session.
//!
//! ```text
//! Offer:    pending ──► accepted
//!              └──────► declined
//! Session:  active  ──► completed   (on first accept)
//! ```
//!
//! # Events
//!
//! - `CurrentOffers` - offer history sent when a participant joins
//! - `OfferUpdate` - offer history after any offer mutation
//! - `NegotiationEnded` - an offer was accepted

mod aggregate;
mod errors;
mod events;
mod offer;
mod policy;

pub use aggregate::NegotiationSession;
pub use errors::NegotiationError;
pub use events::{NegotiationEvent, OfferView, OfferedBy};
pub use offer::{Offer, OfferAmount};
pub use policy::NegotiationPolicy;
