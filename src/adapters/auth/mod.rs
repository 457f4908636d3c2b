//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 tokens signed with the configured shared secret
//! - `mock` - token table for tests and local runs

mod jwt;
mod mock;

pub use jwt::{JwtSessionValidator, TokenClaims, TokenUser};
pub use mock::MockSessionValidator;
