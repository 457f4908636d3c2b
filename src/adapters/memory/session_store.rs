//! In-memory implementation of SessionStore.
//!
//! Records live for the lifetime of the process. Writes honour the same
//! version check as the PostgreSQL store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::negotiation::NegotiationSession;
use crate::ports::SessionStore;

/// In-memory session store backed by a `RwLock<HashMap>`.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, NegotiationSession>>,
}

impl InMemorySessionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<NegotiationSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn create(&self, session: &NegotiationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionAlreadyExists,
                format!("Session already exists: {}", session.id()),
            ));
        }
        sessions.insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &NegotiationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(session.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
        })?;

        if stored.version() != session.version() {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("Session {} was modified concurrently", session.id()),
            )
            .with_detail("expected_version", session.version().to_string())
            .with_detail("actual_version", stored.version().to_string()));
        }

        let mut next = session.clone();
        next.increment_version();
        *stored = next;
        Ok(())
    }
}
