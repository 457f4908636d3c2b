//! HTTP adapter for negotiation endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, JoinSessionRequest, SessionCommandResponse, SessionResponse};
pub use routes::negotiation_routes;
