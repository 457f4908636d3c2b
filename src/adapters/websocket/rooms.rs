//! WebSocket room management for session-based message routing.
//!
//! Rooms are organized by session ID. A connection may sit in several
//! rooms at once; events published to a session reach only the
//! connections in that session's room.
//!
//! # Architecture
//!
//! ```text
//! Room: session-123    Room: session-456
//! ├── client-a         ├── client-a
//! ├── client-b         └── client-d
//! └── client-c
//! ```
//!
//! Each connection owns a bounded outbound queue. Publishing uses
//! `try_send`, so a slow or dead connection never blocks delivery to the
//! rest of the room; a full queue drops the message for that connection only.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::domain::foundation::SessionId;
use crate::domain::negotiation::NegotiationEvent;
use crate::ports::NegotiationPublisher;

use super::messages::ServerMessage;

/// Unique identifier for a WebSocket client connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Create a new random client ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
struct Registry {
    /// Outbound queue per live connection.
    senders: HashMap<ClientId, mpsc::Sender<ServerMessage>>,
    /// session_id → members.
    rooms: HashMap<SessionId, HashSet<ClientId>>,
    /// client_id → sessions joined, for O(1) cleanup on disconnect.
    memberships: HashMap<ClientId, HashSet<SessionId>>,
}

/// Per-process broadcast router.
///
/// Owns only ephemeral membership; nothing here is persisted.
///
/// # Thread Safety
///
/// One `RwLock` guards the whole registry. Publishing takes the read lock,
/// so broadcasts to different rooms proceed concurrently.
pub struct RoomManager {
    registry: RwLock<Registry>,
    /// Outbound queue capacity per connection.
    outbound_capacity: usize,
}

impl RoomManager {
    /// Create a room manager with the given per-connection queue capacity.
    pub fn new(outbound_capacity: usize) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    /// Create with default capacity (64 messages).
    pub fn with_default_capacity() -> Self {
        Self::new(64)
    }

    /// Register a new connection and return its outbound queue.
    pub async fn register(&self) -> (ClientId, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(self.outbound_capacity);
        let client_id = ClientId::new();
        self.registry.write().await.senders.insert(client_id, tx);
        (client_id, rx)
    }

    /// Add a connection to a session's room. Idempotent.
    ///
    /// Returns `true` if the connection was not already a member.
    pub async fn join_channel(&self, session_id: &SessionId, client_id: ClientId) -> bool {
        let mut registry = self.registry.write().await;
        if !registry.senders.contains_key(&client_id) {
            tracing::debug!(client_id = %client_id, "Ignoring join for unregistered client");
            return false;
        }

        let added = registry
            .rooms
            .entry(session_id.clone())
            .or_default()
            .insert(client_id);
        registry
            .memberships
            .entry(client_id)
            .or_default()
            .insert(session_id.clone());
        added
    }

    /// Remove a connection from every room and drop its queue.
    ///
    /// Rooms left empty are evicted.
    pub async fn leave(&self, client_id: ClientId) {
        let mut registry = self.registry.write().await;
        registry.senders.remove(&client_id);

        if let Some(sessions) = registry.memberships.remove(&client_id) {
            for session_id in &sessions {
                remove_member(&mut registry.rooms, session_id, &client_id);
            }
        }
    }

    /// Deliver a message to every connection in a session's room.
    ///
    /// Returns the number of connections the message was queued for.
    pub async fn publish(&self, session_id: &SessionId, message: ServerMessage) -> usize {
        let registry = self.registry.read().await;
        let Some(members) = registry.rooms.get(session_id) else {
            return 0;
        };

        let mut delivered = 0;
        for client_id in members {
            let Some(sender) = registry.senders.get(client_id) else {
                continue;
            };
            match sender.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        client_id = %client_id,
                        session_id = %session_id,
                        event = message.event_name(),
                        "Outbound queue full, dropping message"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(client_id = %client_id, "Connection closed before delivery");
                }
            }
        }
        delivered
    }

    /// Deliver a message to one connection only.
    pub async fn send_to(&self, client_id: ClientId, message: ServerMessage) -> bool {
        let registry = self.registry.read().await;
        match registry.senders.get(&client_id) {
            Some(sender) => sender.try_send(message).is_ok(),
            None => false,
        }
    }

    /// Number of connections in a session's room.
    pub async fn member_count(&self, session_id: &SessionId) -> usize {
        self.registry
            .read()
            .await
            .rooms
            .get(session_id)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    /// All sessions with at least one member.
    pub async fn active_rooms(&self) -> Vec<SessionId> {
        self.registry.read().await.rooms.keys().cloned().collect()
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.registry.read().await.senders.len()
    }
}

fn remove_member(
    rooms: &mut HashMap<SessionId, HashSet<ClientId>>,
    session_id: &SessionId,
    client_id: &ClientId,
) {
    if let Some(members) = rooms.get_mut(session_id) {
        members.remove(client_id);
        if members.is_empty() {
            rooms.remove(session_id);
        }
    }
}

#[async_trait]
impl NegotiationPublisher for RoomManager {
    async fn publish(&self, session_id: &SessionId, event: NegotiationEvent) {
        let name = event.name();
        let delivered = RoomManager::publish(self, session_id, ServerMessage::from(event)).await;
        tracing::debug!(session_id = %session_id, event = name, delivered, "Event published");
    }
}
