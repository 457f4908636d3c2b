//! WebSocket adapters for real-time negotiation.
//!
//! # Architecture
//!
//! ```text
//! client ──frame──▶ handler ──▶ Gateway ──▶ NegotiationHandlers ──▶ SessionStore
//!                                  │                  │
//!                       errors (sender only)     publish (session)
//!                                  ▼                  ▼
//!                              RoomManager ◀──────────┘
//!                                  │
//!                         per-connection queues ──frame──▶ clients
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`rooms`] - Broadcast router keyed by session
//! - [`gateway`] - Command dispatch for authenticated connections
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod gateway;
pub mod handler;
pub mod messages;
pub mod rooms;

pub use gateway::{Connection, Gateway};
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{
    AmountInput, ClientCommand, ConnectedMessage, ErrorMessage, NegotiationEndedMessage,
    PongMessage, ServerMessage,
};
pub use rooms::{ClientId, RoomManager};
