//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Types here are shared by the auth service and every service that
//! authenticates requests against it.

pub mod account;
pub mod constants;
pub mod error;
pub mod password;
pub mod session;
pub mod token;

pub use account::Account;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use session::Session;
pub use token::{TokenClaims, TokenKind, TokenVerdict};
