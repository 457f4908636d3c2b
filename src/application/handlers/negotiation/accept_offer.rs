//! AcceptOfferHandler - Command handler for accepting an offer.
//!
//! Acceptance is terminal: the offer becomes accepted, the session becomes
//! completed, and every connection in the session receives the updated
//! history followed by `NegotiationEnded`.

use std::sync::Arc;

use crate::application::SessionLocks;
use crate::domain::foundation::{AuthenticatedUser, OfferId, SessionId};
use crate::domain::negotiation::{
    NegotiationError, NegotiationEvent, NegotiationPolicy, Offer, OfferView,
};
use crate::ports::{NegotiationPublisher, SessionStore};

use super::load_session;

/// Command to accept an offer.
#[derive(Debug, Clone)]
pub struct AcceptOfferCommand {
    pub session_id: SessionId,
    pub user: AuthenticatedUser,
    /// Offer id as supplied by the client.
    pub offer_id: String,
}

/// Result of a successful acceptance.
#[derive(Debug, Clone)]
pub struct AcceptOfferResult {
    pub accepted: Offer,
    pub offers: Vec<OfferView>,
}

/// Handler for accepting offers.
pub struct AcceptOfferHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    publisher: Arc<dyn NegotiationPublisher>,
    policy: NegotiationPolicy,
}

impl AcceptOfferHandler {
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
        cmd: AcceptOfferCommand,
    ) -> Result<AcceptOfferResult, NegotiationError> {
        let _guard = self.locks.acquire(&cmd.session_id).await;

        // 1. Resolve session, then offer
        let mut session = load_session(self.store.as_ref(), &cmd.session_id).await?;
        let offer_id: OfferId = cmd
            .offer_id
            .parse()
            .map_err(|_| NegotiationError::offer_not_found(cmd.offer_id.clone()))?;

        // 2. Apply
        let accepted = session.accept_offer(&offer_id, &cmd.user.id, &self.policy)?;

        // 3. Persist
        self.store.update(&session).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            offer_id = %offer_id,
            accepted_by = %cmd.user.id,
            "Offer accepted, negotiation completed"
        );

        // 4. Publish history, then the terminal event
        let offers = session.offer_views();
        self.publisher
            .publish(&cmd.session_id, NegotiationEvent::OfferUpdate(offers.clone()))
            .await;
        self.publisher
            .publish(
                &cmd.session_id,
                NegotiationEvent::NegotiationEnded {
                    accepted_offer: OfferView::from(&accepted),
                    by_user: cmd.user.display_name.clone(),
                },
            )
            .await;

        Ok(AcceptOfferResult { accepted, offers })
    }
}
