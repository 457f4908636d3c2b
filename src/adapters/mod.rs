//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT and mock credential validators
//! - `http` - REST endpoints, middleware, router composition
//! - `memory` - In-memory session store
//! - `postgres` - PostgreSQL session store
//! - `websocket` - Broadcast router and connection gateway

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use memory::InMemorySessionStore;
pub use postgres::PostgresSessionStore;
pub use websocket::{Gateway, RoomManager};
