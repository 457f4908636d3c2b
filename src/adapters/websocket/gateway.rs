//! Connection gateway: binds an authenticated user to a connection and
//! turns inbound commands into handler invocations.
//!
//! Successful commands reach the session's room through the handlers'
//! publisher. Rejections go back to the originating connection only.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::{
    AcceptOfferCommand, DeclineOfferCommand, JoinMode, JoinSessionCommand, NegotiationHandlers,
    SubmitOfferCommand,
};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::negotiation::NegotiationError;

use super::messages::{ClientCommand, ConnectedMessage, ErrorMessage, PongMessage, ServerMessage};
use super::rooms::{ClientId, RoomManager};

/// A live, authenticated connection.
///
/// The identity is fixed for the connection's lifetime.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ClientId,
    pub user: AuthenticatedUser,
}

/// Dispatches commands from authenticated connections.
pub struct Gateway {
    handlers: NegotiationHandlers,
    rooms: Arc<RoomManager>,
}

impl Gateway {
    pub fn new(handlers: NegotiationHandlers, rooms: Arc<RoomManager>) -> Self {
        Self { handlers, rooms }
    }

    pub fn rooms(&self) -> &Arc<RoomManager> {
        &self.rooms
    }

    /// Register a connection for `user` and greet it.
    pub async fn connect(
        &self,
        user: AuthenticatedUser,
    ) -> (Connection, mpsc::Receiver<ServerMessage>) {
        let (id, outbound) = self.rooms.register().await;
        let connection = Connection { id, user };

        self.rooms
            .send_to(
                id,
                ServerMessage::Connected(ConnectedMessage {
                    connection_id: id.to_string(),
                    user_id: connection.user.id.clone(),
                    display_name: connection.user.display_name.clone(),
                    timestamp: Timestamp::now(),
                }),
            )
            .await;

        tracing::info!(
            client_id = %id,
            user_id = %connection.user.id,
            "Connection registered"
        );
        (connection, outbound)
    }

    /// Remove the connection from every session it joined.
    pub async fn disconnect(&self, connection: &Connection) {
        self.rooms.leave(connection.id).await;
        tracing::info!(client_id = %connection.id, "Connection closed");
    }

    /// Parse and dispatch one text frame.
    pub async fn handle_text(&self, connection: &Connection, text: &str) {
        match ClientCommand::parse(text) {
            Ok(command) => self.dispatch(connection, command).await,
            Err(e) => {
                tracing::debug!(client_id = %connection.id, "Malformed frame: {}", e);
                self.reply(connection, ServerMessage::Error(ErrorMessage::malformed(e)))
                    .await;
            }
        }
    }

    /// Process one text frame on its own task.
    ///
    /// The command runs to completion even if the caller is aborted, so
    /// closing a socket never separates a persisted change from its
    /// broadcast.
    pub fn spawn_text(self: &Arc<Self>, connection: &Connection, text: String) -> JoinHandle<()> {
        let gateway = Arc::clone(self);
        let connection = connection.clone();
        tokio::spawn(async move { gateway.handle_text(&connection, &text).await })
    }

    /// Dispatch one command. Rejections are reported to `connection` only.
    pub async fn dispatch(&self, connection: &Connection, command: ClientCommand) {
        let session_id = command.session_id().cloned();
        let event = command_name(&command);

        if let Err(err) = self.execute(connection, command).await {
            match &err {
                NegotiationError::StoreUnavailable(detail) => tracing::error!(
                    client_id = %connection.id,
                    event,
                    "Command failed: {}",
                    detail
                ),
                _ => tracing::debug!(
                    client_id = %connection.id,
                    event,
                    code = err.wire_code(),
                    "Command rejected"
                ),
            }

            let mut message = ErrorMessage::from(&err);
            if let Some(session_id) = &session_id {
                message = message.for_session(session_id);
            }
            self.reply(connection, ServerMessage::Error(message)).await;
        }
    }

    async fn execute(
        &self,
        connection: &Connection,
        command: ClientCommand,
    ) -> Result<(), NegotiationError> {
        match command {
            ClientCommand::JoinSession { session_id } => {
                // Enter the room under the session lock, after the join is
                // persisted and before currentOffers goes out.
                let (rooms, room, client_id) = (&self.rooms, &session_id, connection.id);
                self.handlers
                    .join
                    .handle_then(
                        JoinSessionCommand {
                            session_id: session_id.clone(),
                            user: connection.user.clone(),
                            mode: JoinMode::Realtime,
                        },
                        || async move {
                            rooms.join_channel(room, client_id).await;
                        },
                    )
                    .await
                    .map(|_| ())
            }
            ClientCommand::NewOffer {
                session_id,
                offer_amount,
            } => self
                .handlers
                .submit
                .handle(SubmitOfferCommand {
                    session_id,
                    user: connection.user.clone(),
                    amount: offer_amount.value(),
                })
                .await
                .map(|_| ()),
            ClientCommand::AcceptOffer {
                session_id,
                offer_id,
            } => self
                .handlers
                .accept
                .handle(AcceptOfferCommand {
                    session_id,
                    user: connection.user.clone(),
                    offer_id,
                })
                .await
                .map(|_| ()),
            ClientCommand::DeclineOffer {
                session_id,
                offer_id,
            } => self
                .handlers
                .decline
                .handle(DeclineOfferCommand {
                    session_id,
                    user: connection.user.clone(),
                    offer_id,
                })
                .await
                .map(|_| ()),
            ClientCommand::Ping => {
                self.reply(
                    connection,
                    ServerMessage::Pong(PongMessage {
                        timestamp: Timestamp::now(),
                    }),
                )
                .await;
                Ok(())
            }
        }
    }

    async fn reply(&self, connection: &Connection, message: ServerMessage) {
        if !self.rooms.send_to(connection.id, message).await {
            tracing::debug!(client_id = %connection.id, "Reply dropped");
        }
    }
}

fn command_name(command: &ClientCommand) -> &'static str {
    match command {
        ClientCommand::JoinSession { .. } => "joinSession",
        ClientCommand::NewOffer { .. } => "newOffer",
        ClientCommand::AcceptOffer { .. } => "acceptOffer",
        ClientCommand::DeclineOffer { .. } => "declineOffer",
        ClientCommand::Ping => "ping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::adapters::websocket::messages::AmountInput;
    use crate::application::handlers::negotiation::test_support::FailingStore;
    use crate::domain::foundation::{SessionId, UserId};
    use crate::domain::negotiation::NegotiationPolicy;
    use crate::ports::SessionStore;

    fn gateway() -> Gateway {
        gateway_with_store(Arc::new(InMemorySessionStore::new()))
    }

    fn gateway_with_store(store: Arc<dyn SessionStore>) -> Gateway {
        let rooms = Arc::new(RoomManager::with_default_capacity());
        let handlers = NegotiationHandlers::new(store, rooms.clone(), NegotiationPolicy::default());
        Gateway::new(handlers, rooms)
    }

    fn user(id: &str, name: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), name)
    }

    fn sid(s: &str) -> SessionId {
        SessionId::new(s).unwrap()
    }

    async fn next(rx: &mut mpsc::Receiver<ServerMessage>) -> ServerMessage {
        rx.try_recv().expect("expected a queued message")
    }

    #[tokio::test]
    async fn connect_sends_greeting() {
        let gw = gateway();
        let (conn, mut rx) = gw.connect(user("user-a", "Alice")).await;

        match next(&mut rx).await {
            ServerMessage::Connected(msg) => {
                assert_eq!(msg.connection_id, conn.id.to_string());
                assert_eq!(msg.display_name, "Alice");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn join_delivers_current_offers_to_joiner() {
        let gw = gateway();
        let (conn, mut rx) = gw.connect(user("user-a", "Alice")).await;
        next(&mut rx).await;

        gw.dispatch(
            &conn,
            ClientCommand::JoinSession {
                session_id: sid("s1"),
            },
        )
        .await;

        assert_eq!(next(&mut rx).await, ServerMessage::CurrentOffers(vec![]));
    }

    #[tokio::test]
    async fn failed_join_leaves_no_membership() {
        let gw = gateway_with_store(Arc::new(FailingStore));
        let (conn, mut rx) = gw.connect(user("user-a", "Alice")).await;
        next(&mut rx).await;

        gw.dispatch(
            &conn,
            ClientCommand::JoinSession {
                session_id: sid("s1"),
            },
        )
        .await;

        match next(&mut rx).await {
            ServerMessage::Error(err) => {
                assert_eq!(err.code, "STORE_UNAVAILABLE");
                assert_eq!(err.session_id, Some(sid("s1")));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(gw.rooms().member_count(&sid("s1")).await, 0);

        let pong = ServerMessage::Pong(PongMessage {
            timestamp: Timestamp::now(),
        });
        assert_eq!(gw.rooms().publish(&sid("s1"), pong).await, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn spawned_frame_completes_without_awaiting() {
        let gw = Arc::new(gateway());
        let (conn, mut rx) = gw.connect(user("user-a", "Alice")).await;
        next(&mut rx).await;

        let frame = r#"{"event":"joinSession","data":{"sessionId":"s1"}}"#;
        drop(gw.spawn_text(&conn, frame.to_string()));

        let message = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message, ServerMessage::CurrentOffers(vec![]));
        assert_eq!(gw.rooms().member_count(&sid("s1")).await, 1);
    }

    #[tokio::test]
    async fn rejection_goes_to_sender_only() {
        let gw = gateway();
        let (a, mut rx_a) = gw.connect(user("user-a", "Alice")).await;
        let (b, mut rx_b) = gw.connect(user("user-b", "Bob")).await;
        next(&mut rx_a).await;
        next(&mut rx_b).await;
        for conn in [&a, &b] {
            gw.dispatch(
                conn,
                ClientCommand::JoinSession {
                    session_id: sid("s1"),
                },
            )
            .await;
        }
        while rx_a.try_recv().is_ok() {}
        while rx_b.try_recv().is_ok() {}

        gw.dispatch(
            &a,
            ClientCommand::NewOffer {
                session_id: sid("s1"),
                offer_amount: AmountInput::Number(-1.0),
            },
        )
        .await;

        match next(&mut rx_a).await {
            ServerMessage::Error(err) => {
                assert_eq!(err.code, "VALIDATION_FAILED");
                assert_eq!(err.session_id, Some(sid("s1")));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_frame_is_reported() {
        let gw = gateway();
        let (conn, mut rx) = gw.connect(user("user-a", "Alice")).await;
        next(&mut rx).await;

        gw.handle_text(&conn, "{not json").await;

        match next(&mut rx).await {
            ServerMessage::Error(err) => assert_eq!(err.code, "VALIDATION_FAILED"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn ping_is_answered_with_pong() {
        let gw = gateway();
        let (conn, mut rx) = gw.connect(user("user-a", "Alice")).await;
        next(&mut rx).await;

        gw.handle_text(&conn, r#"{"event":"ping"}"#).await;

        assert_eq!(next(&mut rx).await.event_name(), "pong");
    }

    #[tokio::test]
    async fn offer_on_unknown_session_is_not_found() {
        let gw = gateway();
        let (conn, mut rx) = gw.connect(user("user-a", "Alice")).await;
        next(&mut rx).await;

        gw.dispatch(
            &conn,
            ClientCommand::NewOffer {
                session_id: sid("ghost"),
                offer_amount: AmountInput::Number(10.0),
            },
        )
        .await;

        match next(&mut rx).await {
            ServerMessage::Error(err) => {
                assert_eq!(err.code, "SESSION_NOT_FOUND");
                assert_eq!(err.message, "Session not found.");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn disconnect_leaves_all_rooms() {
        let gw = gateway();
        let (conn, _rx) = gw.connect(user("user-a", "Alice")).await;
        for s in ["s1", "s2"] {
            gw.dispatch(&conn, ClientCommand::JoinSession { session_id: sid(s) })
                .await;
        }

        gw.disconnect(&conn).await;

        assert!(gw.rooms().active_rooms().await.is_empty());
        assert_eq!(gw.rooms().connection_count().await, 0);
    }
}
