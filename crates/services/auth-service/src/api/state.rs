//! Application state - dependency injection container.

use std::sync::Arc;

use async_trait::async_trait;

use crate::infra::Database;
use crate::service::{AccountService, SessionService};
use common::AppResult;

/// Backing-store liveness check used by `/health`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> AppResult<()> {
        Database::ping(self).await?;
        Ok(())
    }
}

/// HTTP-layer settings.
#[derive(Debug, Clone, Default)]
pub struct ApiSettings {
    /// Admin endpoints answer 403 while this is unset
    pub admin_api_key: Option<String>,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountService>,
    pub sessions: Arc<dyn SessionService>,
    pub health: Arc<dyn HealthProbe>,
    pub settings: Arc<ApiSettings>,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        sessions: Arc<dyn SessionService>,
        health: Arc<dyn HealthProbe>,
        settings: ApiSettings,
    ) -> Self {
        Self {
            accounts,
            sessions,
            health,
            settings: Arc::new(settings),
        }
    }
}
