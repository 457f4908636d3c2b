//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the negotiation core and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - durable session records
//! - `SessionValidator` - identity provider (credential → user)
//! - `NegotiationPublisher` - fan-out of events to a session's connections

mod negotiation_publisher;
mod session_store;
mod session_validator;

pub use negotiation_publisher::NegotiationPublisher;
pub use session_store::SessionStore;
pub use session_validator::SessionValidator;
