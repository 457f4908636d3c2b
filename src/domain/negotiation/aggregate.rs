//! Negotiation session aggregate.
//!
//! A session holds the ordered offer history of one negotiation and its
//! participants. It completes exactly once, when one offer is accepted.
//!
//! The aggregate is pure: it never touches storage. Command handlers load
//! it under the per-session lock, apply one mutation and write it back.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AuthenticatedUser, OfferId, OfferStatus, SessionId, SessionStatus, StateMachine, Timestamp,
    UserId,
};

use super::{NegotiationError, NegotiationPolicy, Offer, OfferAmount, OfferView};

/// Negotiation session aggregate.
///
/// # Invariants
///
/// - `offers` is in submission order
/// - `participants` contains no duplicates
/// - at most one offer is `Accepted`, and only if `status` is `Completed`
/// - `version` increases by one on every persisted write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSession {
    id: SessionId,
    participants: Vec<UserId>,
    offers: Vec<Offer>,
    status: SessionStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
    version: i64,
}

impl NegotiationSession {
    /// Create a new active session with its first participant.
    pub fn new(id: SessionId, creator: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            participants: vec![creator],
            offers: Vec::new(),
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        participants: Vec<UserId>,
        offers: Vec<Offer>,
        status: SessionStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            participants,
            offers,
            status,
            created_at,
            updated_at,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Version the session was loaded at; stores compare against it.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    pub fn offer(&self, offer_id: &OfferId) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id() == offer_id)
    }

    /// The accepted offer, once the session has completed.
    pub fn accepted_offer(&self) -> Option<&Offer> {
        self.offers
            .iter()
            .find(|o| o.status() == OfferStatus::Accepted)
    }

    /// Offer history as participants see it.
    pub fn offer_views(&self) -> Vec<OfferView> {
        self.offers.iter().map(OfferView::from).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a participant. Returns false if they were already present.
    pub fn add_participant(&mut self, user_id: UserId) -> bool {
        if self.is_participant(&user_id) {
            return false;
        }
        self.participants.push(user_id);
        self.touch();
        true
    }

    /// Append a new pending offer.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is no longer active and the policy
    ///   does not allow late offers
    pub fn submit_offer(
        &mut self,
        by: &AuthenticatedUser,
        amount: OfferAmount,
        policy: &NegotiationPolicy,
    ) -> Result<&Offer, NegotiationError> {
        if !self.status.is_active() && !policy.allow_offers_after_completion {
            return Err(NegotiationError::session_closed(&self.id));
        }

        self.offers
            .push(Offer::new(amount, by.id.clone(), by.display_name.clone()));
        self.touch();

        let index = self.offers.len() - 1;
        Ok(&self.offers[index])
    }

    /// Accept a pending offer, completing the session.
    ///
    /// # Errors
    ///
    /// - `OfferNotFound` if the offer is not part of this session
    /// - `OfferAlreadyProcessed` if the offer is no longer pending
    /// - `SessionClosed` if another offer already completed the session
    /// - `SelfAcceptance` if the policy forbids accepting one's own offer
    pub fn accept_offer(
        &mut self,
        offer_id: &OfferId,
        by: &UserId,
        policy: &NegotiationPolicy,
    ) -> Result<Offer, NegotiationError> {
        let index = self.pending_offer_index(offer_id)?;

        if !policy.allow_self_acceptance && self.offers[index].offered_by() == by {
            return Err(NegotiationError::SelfAcceptance);
        }

        let completed = self
            .status
            .transition_to(SessionStatus::Completed)
            .map_err(|_| NegotiationError::session_closed(&self.id))?;

        self.offers[index].transition(OfferStatus::Accepted)?;
        self.status = completed;
        self.touch();
        Ok(self.offers[index].clone())
    }

    /// Decline a pending offer. The session stays active.
    ///
    /// # Errors
    ///
    /// - `OfferNotFound` if the offer is not part of this session
    /// - `OfferAlreadyProcessed` if the offer is no longer pending
    /// - `SessionClosed` if the session has completed
    pub fn decline_offer(&mut self, offer_id: &OfferId) -> Result<Offer, NegotiationError> {
        let index = self.pending_offer_index(offer_id)?;

        if !self.status.is_active() {
            return Err(NegotiationError::session_closed(&self.id));
        }

        self.offers[index].transition(OfferStatus::Declined)?;
        self.touch();
        Ok(self.offers[index].clone())
    }

    /// Advance the version after a successful write. Called by stores.
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn pending_offer_index(&self, offer_id: &OfferId) -> Result<usize, NegotiationError> {
        let index = self
            .offers
            .iter()
            .position(|o| o.id() == offer_id)
            .ok_or_else(|| NegotiationError::offer_not_found(offer_id.to_string()))?;

        if !self.offers[index].status().is_pending() {
            return Err(NegotiationError::already_processed(offer_id.to_string()));
        }
        Ok(index)
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
