//! Common utilities shared across all marketplace services.
//!
//! This crate provides:
//! - Unified error handling for HTTP services
//! - Configuration structures
//! - Tracing subscriber setup
//! - Session-token extraction and the cross-service session validator

pub mod auth;
pub mod config;
pub mod error;
#[cfg(feature = "client")]
pub mod http;
pub mod logging;
#[cfg(feature = "client")]
pub mod session_client;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
#[cfg(feature = "client")]
pub use session_client::{require_session, AuthenticatedAccount, SessionValidator};
