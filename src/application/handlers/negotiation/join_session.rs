//! JoinSessionHandler - Command handler for joining a negotiation session.

use std::future::Future;
use std::sync::Arc;

use crate::application::SessionLocks;
use crate::domain::foundation::{AuthenticatedUser, SessionId};
use crate::domain::negotiation::{
    NegotiationError, NegotiationEvent, NegotiationSession, OfferView,
};
use crate::ports::{NegotiationPublisher, SessionStore};

/// How a join treats a session id that does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Real-time join: create the session on first use and send the
    /// current offer history to the session's connections.
    Realtime,
    /// Join an existing session only; no broadcast.
    ExistingOnly,
}

/// Command to join a session.
#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub session_id: SessionId,
    pub user: AuthenticatedUser,
    pub mode: JoinMode,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinSessionResult {
    pub session: NegotiationSession,
    pub offers: Vec<OfferView>,
    pub created: bool,
}

/// Handler for joining sessions.
///
/// Idempotent: rejoining as an existing participant changes nothing.
pub struct JoinSessionHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    publisher: Arc<dyn NegotiationPublisher>,
}

impl JoinSessionHandler {
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
        cmd: JoinSessionCommand,
    ) -> Result<JoinSessionResult, NegotiationError> {
        self.handle_then(cmd, || async {}).await
    }

    /// Join, running `on_joined` under the session lock once the join is
    /// persisted and before the offer history is published.
    ///
    /// `on_joined` is not called when the join fails.
    pub async fn handle_then<F, Fut>(
        &self,
        cmd: JoinSessionCommand,
        on_joined: F,
    ) -> Result<JoinSessionResult, NegotiationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let _guard = self.locks.acquire(&cmd.session_id).await;

        // 1. Load or create
        let (session, created) = match self.store.get(&cmd.session_id).await? {
            Some(mut session) => {
                if session.add_participant(cmd.user.id.clone()) {
                    self.store.update(&session).await?;
                }
                (session, false)
            }
            None if cmd.mode == JoinMode::Realtime => {
                let session = NegotiationSession::new(cmd.session_id.clone(), cmd.user.id.clone());
                self.store.create(&session).await?;
                (session, true)
            }
            None => return Err(NegotiationError::session_not_found(&cmd.session_id)),
        };

        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %cmd.user.id,
            created,
            "User joined session"
        );

        // 2. Hook, then publish current state, both still under the lock
        on_joined().await;

        let offers = session.offer_views();
        if cmd.mode == JoinMode::Realtime {
            self.publisher
                .publish(&cmd.session_id, NegotiationEvent::CurrentOffers(offers.clone()))
                .await;
        }

        Ok(JoinSessionResult {
            session,
            offers,
            created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::application::handlers::negotiation::test_support::{
        alice, bob, sid, FailingStore, RecordingPublisher,
    };

    fn handler(
        store: Arc<dyn SessionStore>,
        publisher: Arc<RecordingPublisher>,
    ) -> JoinSessionHandler {
        JoinSessionHandler::new(store, Arc::new(SessionLocks::new()), publisher)
    }

    fn join(user: AuthenticatedUser, mode: JoinMode) -> JoinSessionCommand {
        JoinSessionCommand {
            session_id: sid("s1"),
            user,
            mode,
        }
    }

    #[tokio::test]
    async fn first_join_creates_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler(store.clone(), publisher.clone());

        let result = handler.handle(join(alice(), JoinMode::Realtime)).await.unwrap();

        assert!(result.created);
        assert!(result.offers.is_empty());
        let stored = store.get(&sid("s1")).await.unwrap().unwrap();
        assert_eq!(stored.participants(), &[alice().id]);
    }

    #[tokio::test]
    async fn second_user_is_added_once() {
        let store = Arc::new(InMemorySessionStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler(store.clone(), publisher);

        handler.handle(join(alice(), JoinMode::Realtime)).await.unwrap();
        handler.handle(join(bob(), JoinMode::Realtime)).await.unwrap();
        let first = store.get(&sid("s1")).await.unwrap().unwrap();
        handler.handle(join(bob(), JoinMode::Realtime)).await.unwrap();
        let second = store.get(&sid("s1")).await.unwrap().unwrap();

        assert_eq!(first.participants(), second.participants());
        assert_eq!(second.participants(), &[alice().id, bob().id]);
        assert_eq!(first.version(), second.version());
    }

    #[tokio::test]
    async fn realtime_join_publishes_current_offers() {
        let store = Arc::new(InMemorySessionStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler(store, publisher.clone());

        handler.handle(join(alice(), JoinMode::Realtime)).await.unwrap();

        let published = publisher.events();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, sid("s1"));
        assert_eq!(published[0].1, NegotiationEvent::CurrentOffers(vec![]));
    }

    #[tokio::test]
    async fn existing_only_join_rejects_unknown_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler(store.clone(), publisher.clone());

        let result = handler.handle(join(alice(), JoinMode::ExistingOnly)).await;

        assert!(matches!(result, Err(NegotiationError::SessionNotFound(_))));
        assert!(store.get(&sid("s1")).await.unwrap().is_none());
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn existing_only_join_does_not_broadcast() {
        let store = Arc::new(InMemorySessionStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler(store, publisher.clone());

        handler.handle(join(alice(), JoinMode::Realtime)).await.unwrap();
        handler.handle(join(bob(), JoinMode::ExistingOnly)).await.unwrap();

        assert_eq!(publisher.events().len(), 1);
    }

    #[tokio::test]
    async fn hook_runs_before_current_offers_are_published() {
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler(Arc::new(InMemorySessionStore::new()), publisher.clone());

        let published_before_hook = std::sync::Mutex::new(None);
        let (seen, recorder) = (&published_before_hook, &publisher);
        handler
            .handle_then(join(alice(), JoinMode::Realtime), || async move {
                *seen.lock().unwrap() = Some(recorder.events().len());
            })
            .await
            .unwrap();

        assert_eq!(*published_before_hook.lock().unwrap(), Some(0));
        assert_eq!(publisher.events().len(), 1);
    }

    #[tokio::test]
    async fn hook_is_skipped_when_join_fails() {
        let handler = handler(Arc::new(FailingStore), Arc::new(RecordingPublisher::new()));

        let mut called = false;
        let result = handler
            .handle_then(join(alice(), JoinMode::Realtime), || {
                called = true;
                async {}
            })
            .await;

        assert!(result.is_err());
        assert!(!called);
    }

    #[tokio::test]
    async fn store_failure_is_reported_and_nothing_published() {
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler(Arc::new(FailingStore), publisher.clone());

        let result = handler.handle(join(alice(), JoinMode::Realtime)).await;

        assert!(matches!(result, Err(NegotiationError::StoreUnavailable(_))));
        assert!(publisher.events().is_empty());
    }
}
