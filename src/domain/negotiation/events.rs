//! State-change events fanned out to every connection in a session.

use serde::Serialize;

use crate::domain::foundation::{OfferStatus, Timestamp, UserId};

use super::Offer;

/// Submitter of an offer, with display name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferedBy {
    pub id: UserId,
    pub display_name: String,
}

/// Read model of an offer as participants see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    pub id: String,
    pub offer_amount: f64,
    pub offered_by: OfferedBy,
    pub status: OfferStatus,
    pub timestamp: Timestamp,
}

impl From<&Offer> for OfferView {
    fn from(offer: &Offer) -> Self {
        Self {
            id: offer.id().to_string(),
            offer_amount: offer.amount().value(),
            offered_by: OfferedBy {
                id: offer.offered_by().clone(),
                display_name: offer.offered_by_name().to_string(),
            },
            status: offer.status(),
            timestamp: *offer.submitted_at(),
        }
    }
}

/// Events produced by the negotiation state machine.
///
/// Events for one session are published in the order the commands that
/// produced them were applied.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationEvent {
    /// Full offer history, sent when a participant joins.
    CurrentOffers(Vec<OfferView>),

    /// Full offer history after an offer was added, accepted or declined.
    OfferUpdate(Vec<OfferView>),

    /// Terminal event: an offer was accepted and the session completed.
    NegotiationEnded {
        accepted_offer: OfferView,
        by_user: String,
    },
}

impl NegotiationEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            NegotiationEvent::CurrentOffers(_) => "currentOffers",
            NegotiationEvent::OfferUpdate(_) => "offerUpdate",
            NegotiationEvent::NegotiationEnded { .. } => "negotiationEnded",
        }
    }
}
