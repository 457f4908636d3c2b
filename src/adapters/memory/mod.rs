//! In-memory adapters.
//!
//! Used by tests and by deployments started without a database URL.

mod session_store;

pub use session_store::InMemorySessionStore;
