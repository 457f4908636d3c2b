//! DeclineOfferHandler - Command handler for declining an offer.

use std::sync::Arc;

use crate::application::SessionLocks;
use crate::domain::foundation::{AuthenticatedUser, OfferId, SessionId};
use crate::domain::negotiation::{NegotiationError, NegotiationEvent, Offer, OfferView};
use crate::ports::{NegotiationPublisher, SessionStore};

use super::load_session;

/// Command to decline an offer.
#[derive(Debug, Clone)]
pub struct DeclineOfferCommand {
    pub session_id: SessionId,
    pub user: AuthenticatedUser,
    pub offer_id: String,
}

/// Result of a successful decline.
#[derive(Debug, Clone)]
pub struct DeclineOfferResult {
    pub declined: Offer,
    pub offers: Vec<OfferView>,
}

/// Handler for declining offers. The session stays active.
pub struct DeclineOfferHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    publisher: Arc<dyn NegotiationPublisher>,
}

impl DeclineOfferHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        locks: Arc<SessionLocks>,
        publisher: Arc<dyn NegotiationPublisher>,
    ) -> Self {
        Self {
            store,
            locks,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: DeclineOfferCommand,
    ) -> Result<DeclineOfferResult, NegotiationError> {
        let _guard = self.locks.acquire(&cmd.session_id).await;

        let mut session = load_session(self.store.as_ref(), &cmd.session_id).await?;
        let offer_id: OfferId = cmd
            .offer_id
            .parse()
            .map_err(|_| NegotiationError::offer_not_found(cmd.offer_id.clone()))?;

        let declined = session.decline_offer(&offer_id)?;
        self.store.update(&session).await?;

        tracing::debug!(
            session_id = %cmd.session_id,
            offer_id = %offer_id,
            declined_by = %cmd.user.id,
            "Offer declined"
        );

        let offers = session.offer_views();
        self.publisher
            .publish(&cmd.session_id, NegotiationEvent::OfferUpdate(offers.clone()))
            .await;

        Ok(DeclineOfferResult { declined, offers })
    }
}
