//! API middleware.

mod guards;
mod session;

pub use guards::{admin_key_middleware, public_only_middleware};
pub use session::{session_middleware, CurrentAccount};
