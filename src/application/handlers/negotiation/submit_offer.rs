//! SubmitOfferHandler - Command handler for submitting a new offer.

use std::sync::Arc;

use crate::application::SessionLocks;
use crate::domain::foundation::{AuthenticatedUser, SessionId};
use crate::domain::negotiation::{
    NegotiationError, NegotiationEvent, NegotiationPolicy, Offer, OfferAmount, OfferView,
};
use crate::ports::{NegotiationPublisher, SessionStore};

use super::load_session;

/// Command to submit an offer.
#[derive(Debug, Clone)]
pub struct SubmitOfferCommand {
    pub session_id: SessionId,
    pub user: AuthenticatedUser,
    /// Raw amount; validated before the session is touched.
    pub amount: f64,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitOfferResult {
    pub offer: Offer,
    pub offers: Vec<OfferView>,
}

/// Handler for submitting offers.
pub struct SubmitOfferHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    publisher: Arc<dyn NegotiationPublisher>,
    policy: NegotiationPolicy,
}

impl SubmitOfferHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        locks: Arc<SessionLocks>,
        publisher: Arc<dyn NegotiationPublisher>,
        policy: NegotiationPolicy,
    ) -> Self {
        Self {
            store,
            locks,
            publisher,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitOfferCommand,
    ) -> Result<SubmitOfferResult, NegotiationError> {
        // 1. Validate input
        let amount = OfferAmount::new(cmd.amount)?;

        let _guard = self.locks.acquire(&cmd.session_id).await;

        // 2. Load and apply
        let mut session = load_session(self.store.as_ref(), &cmd.session_id).await?;
        let offer = session
            .submit_offer(&cmd.user, amount, &self.policy)?
            .clone();

        // 3. Persist
        self.store.update(&session).await?;

        tracing::debug!(
            session_id = %cmd.session_id,
            offer_id = %offer.id(),
            amount = amount.value(),
            "Offer submitted"
        );

        // 4. Publish
        let offers = session.offer_views();
        self.publisher
            .publish(&cmd.session_id, NegotiationEvent::OfferUpdate(offers.clone()))
            .await;

        Ok(SubmitOfferResult { offer, offers })
    }
}
