//! Session store port.
//!
//! Durable mapping from session identifier to negotiation session record.
//! Implementations are atomic at single-record granularity only; multi-step
//! read-modify-write sequences are serialized by the caller
//! (see `application::SessionLocks`).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::negotiation::NegotiationSession;

/// Repository port for negotiation session persistence.
///
/// # Contract
///
/// - `create` fails with `SessionAlreadyExists` if the id is taken
/// - `update` is a full replace guarded by the loaded `version`: it fails
///   with `SessionNotFound` if the record is gone and `ConcurrencyConflict`
///   if another writer got there first
/// - every infrastructure failure is reported as `DatabaseError`
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session by id. Returns `None` if it does not exist.
    async fn get(&self, id: &SessionId) -> Result<Option<NegotiationSession>, DomainError>;

    /// Persist a brand-new session.
    async fn create(&self, session: &NegotiationSession) -> Result<(), DomainError>;

    /// Replace an existing session record.
    async fn update(&self, session: &NegotiationSession) -> Result<(), DomainError>;
}
