//! HTTP adapters - REST API and router composition.

pub mod health;
pub mod middleware;
pub mod negotiation;
pub mod router;

pub use health::health_routes;
pub use negotiation::negotiation_routes;
pub use router::{build_router, AppState};
