//! Negotiation command and query handlers.
//!
//! Every mutating handler follows the same sequence under the per-session
//! lock: load, apply on the aggregate, persist, publish. A failure at any
//! step before persist leaves the stored session untouched and publishes
//! nothing.

mod accept_offer;
mod create_session;
mod decline_offer;
mod get_session;
mod join_session;
mod submit_offer;

use std::sync::Arc;

pub use accept_offer::{AcceptOfferCommand, AcceptOfferHandler, AcceptOfferResult};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use decline_offer::{DeclineOfferCommand, DeclineOfferHandler, DeclineOfferResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use join_session::{JoinMode, JoinSessionCommand, JoinSessionHandler, JoinSessionResult};
pub use submit_offer::{SubmitOfferCommand, SubmitOfferHandler, SubmitOfferResult};

use crate::application::SessionLocks;
use crate::domain::foundation::SessionId;
use crate::domain::negotiation::{NegotiationError, NegotiationPolicy, NegotiationSession};
use crate::ports::{NegotiationPublisher, SessionStore};

async fn load_session(
    store: &dyn SessionStore,
    session_id: &SessionId,
) -> Result<NegotiationSession, NegotiationError> {
    store
        .get(session_id)
        .await?
        .ok_or_else(|| NegotiationError::session_not_found(session_id))
}

/// All negotiation handlers wired to one store, one lock table and one
/// publisher.
#[derive(Clone)]
pub struct NegotiationHandlers {
    pub join: Arc<JoinSessionHandler>,
    pub submit: Arc<SubmitOfferHandler>,
    pub accept: Arc<AcceptOfferHandler>,
    pub decline: Arc<DeclineOfferHandler>,
    pub create: Arc<CreateSessionHandler>,
    pub get: Arc<GetSessionHandler>,
}

impl NegotiationHandlers {
    pub fn new(
        store: Arc<dyn SessionStore>,
        publisher: Arc<dyn NegotiationPublisher>,
        policy: NegotiationPolicy,
    ) -> Self {
        let locks = Arc::new(SessionLocks::new());
        Self {
            join: Arc::new(JoinSessionHandler::new(
                store.clone(),
                locks.clone(),
                publisher.clone(),
            )),
            submit: Arc::new(SubmitOfferHandler::new(
                store.clone(),
                locks.clone(),
                publisher.clone(),
                policy,
            )),
            accept: Arc::new(AcceptOfferHandler::new(
                store.clone(),
                locks.clone(),
                publisher.clone(),
                policy,
            )),
            decline: Arc::new(DeclineOfferHandler::new(
                store.clone(),
                locks,
                publisher,
            )),
            create: Arc::new(CreateSessionHandler::new(store.clone())),
            get: Arc::new(GetSessionHandler::new(store)),
        }
    }
}
