//! OfferStatus enum for the accept/decline lifecycle of a single offer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of an offer.
///
/// `Pending` is the only non-terminal state; an offer is never re-opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl OfferStatus {
    /// Returns true while the offer still awaits a response.
    pub fn is_pending(&self) -> bool {
        matches!(self, OfferStatus::Pending)
    }
}

impl StateMachine for OfferStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OfferStatus::*;
        matches!((self, target), (Pending, Accepted) | (Pending, Declined))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            OfferStatus::Pending => vec![OfferStatus::Accepted, OfferStatus::Declined],
            OfferStatus::Accepted | OfferStatus::Declined => vec![],
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Declined => "declined",
        };
        write!(f, "{}", s)
    }
}
