//! Wires repositories, token issuer and managers from configuration.

use std::sync::Arc;

use chrono::Duration;

use crate::config::AuthServiceConfig;
use crate::infra::{Cache, Database};
use crate::repository::{AccountStore, SessionStore};
use crate::service::{
    AccountManager, AccountService, Clock, LogMailer, MemoryDenylist, RedisDenylist,
    SessionManager, SessionService, SessionSettings, SystemClock, TokenDenylist, TokenIssuer,
};
use common::AppResult;

/// Key prefix for everything this service stores in Redis
const CACHE_KEY_PREFIX: &str = "auth";

/// Fully wired services sharing one database and clock.
#[derive(Clone)]
pub struct ServiceContainer {
    pub accounts: Arc<dyn AccountService>,
    pub sessions: Arc<dyn SessionService>,
}

impl ServiceContainer {
    pub async fn from_config(config: &AuthServiceConfig, db: &Database) -> AppResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let sessions = session_manager(config, db, clock.clone());

        let denylist: Arc<dyn TokenDenylist> = match &config.redis_url {
            Some(url) => Arc::new(RedisDenylist::new(
                Cache::connect(url, CACHE_KEY_PREFIX).await?,
            )),
            None => {
                tracing::warn!("REDIS_URL not set, revoked tokens are tracked in memory only");
                Arc::new(MemoryDenylist::new(clock.clone()))
            }
        };

        let tokens = Arc::new(TokenIssuer::new(
            config.jwt_secret_bytes(),
            config.jwt_algorithm()?,
            clock.clone(),
            denylist,
        ));

        let accounts = Arc::new(AccountManager::new(
            Arc::new(AccountStore::new(db.get_connection())),
            sessions.clone(),
            tokens,
            Arc::new(LogMailer::new(config.public_base_url.clone())),
            clock,
        ));

        Ok(Self {
            accounts,
            sessions,
        })
    }
}

/// Session manager alone, for maintenance commands that need no tokens.
pub fn session_manager(
    config: &AuthServiceConfig,
    db: &Database,
    clock: Arc<dyn Clock>,
) -> Arc<dyn SessionService> {
    let settings = SessionSettings {
        ttl: Duration::seconds(config.session_ttl_seconds),
        track_last_used: config.track_last_used,
    };

    Arc::new(SessionManager::new(
        Arc::new(SessionStore::new(db.get_connection())),
        clock,
        settings,
    ))
}
