//! Auth Service Library
//!
//! Session lifecycle, registration, password reset and account verification
//! for the marketplace, served over HTTP.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod container;
pub mod infra;
pub mod repository;
pub mod service;

pub use api::{create_router, ApiSettings, AppState};
pub use config::AuthServiceConfig;
pub use container::ServiceContainer;
