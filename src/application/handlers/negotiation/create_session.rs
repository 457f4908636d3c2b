//! CreateSessionHandler - Command handler for opening a session with a
//! server-generated identifier.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, SessionId};
use crate::domain::negotiation::{NegotiationError, NegotiationSession};
use crate::ports::SessionStore;

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub user: AuthenticatedUser,
}

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub session: NegotiationSession,
}

/// Handler for creating sessions.
///
/// Generated ids are fresh UUIDs, so no session lock is needed.
pub struct CreateSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
    ) -> Result<CreateSessionResult, NegotiationError> {
        let session = NegotiationSession::new(SessionId::generate(), cmd.user.id.clone());
        self.store.create(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            creator = %cmd.user.id,
            "Negotiation session created"
        );

        Ok(CreateSessionResult { session })
    }
}
