//! Repository layer for data access.

mod account_repository;
pub mod entities;
mod session_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use session_repository::{SessionRepository, SessionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use session_repository::MockSessionRepository;
