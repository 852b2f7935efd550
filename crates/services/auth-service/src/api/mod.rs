//! HTTP layer: handlers, guards, extractors and routing.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::{ApiSettings, AppState, HealthProbe};
