//! GetSessionHandler - Query handler returning a session snapshot.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::negotiation::{NegotiationError, NegotiationSession};
use crate::ports::SessionStore;

use super::load_session;

/// Query for a single session.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Read-only handler; takes no session lock.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetSessionQuery,
    ) -> Result<NegotiationSession, NegotiationError> {
        load_session(self.store.as_ref(), &query.session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::application::handlers::negotiation::test_support::{alice, seeded_store, sid};

    #[tokio::test]
    async fn returns_stored_session() {
        let store = seeded_store().await;
        let handler = GetSessionHandler::new(store);

        let session = handler
            .handle(GetSessionQuery {
                session_id: sid("s1"),
            })
            .await
            .unwrap();

        assert_eq!(session.participants(), &[alice().id]);
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let handler = GetSessionHandler::new(Arc::new(InMemorySessionStore::new()));

        let result = handler
            .handle(GetSessionQuery {
                session_id: sid("nope"),
            })
            .await;

        assert!(matches!(result, Err(NegotiationError::SessionNotFound(_))));
    }
}
