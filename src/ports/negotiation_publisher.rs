//! NegotiationPublisher port - fan-out of state-change events.
//!
//! Command handlers publish through this port while they still hold the
//! per-session lock, so every member of a session observes events in the
//! order the commands were applied.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::negotiation::NegotiationEvent;

/// Port for broadcasting negotiation events to a session's live viewers.
///
/// Implementations must:
/// - deliver to every connection currently joined to `session_id` and to
///   no other connection
/// - never block on, or fail because of, a slow or dead receiver
#[async_trait]
pub trait NegotiationPublisher: Send + Sync {
    /// Best-effort, fire-and-forget delivery.
    async fn publish(&self, session_id: &SessionId, event: NegotiationEvent);
}
