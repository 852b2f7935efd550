//! Session lifecycle: create, resolve, log out, sweep.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use super::clock::Clock;
use crate::repository::SessionRepository;
use common::{AppError, AppResult, OptionExt};
use domain::{
    session_key_prefix, Session, MIN_INACTIVE_SWEEP_DAYS, SESSION_KEY_LENGTH, SESSION_TTL_SECONDS,
};

/// Session lifecycle operations.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Start a session for an account and return its key
    async fn create_session(&self, account_id: i64) -> AppResult<String>;

    /// Resolve a live session key to its account; `NotFound` if absent or expired
    async fn get_account_id(&self, token: &str) -> AppResult<i64>;

    /// Log out; `NotFound` if absent or already expired
    async fn delete_session(&self, token: &str) -> AppResult<()>;

    /// Purge rows whose expiry has passed
    async fn hard_delete_expired_sessions(&self) -> AppResult<u64>;

    /// Purge rows unused for a full session TTL
    async fn hard_delete_inactive_sessions(&self) -> AppResult<u64>;

    /// Purge rows unused for `idle_for` (never less than the minimum sweep window)
    async fn hard_delete_idle_sessions(&self, idle_for: Duration) -> AppResult<u64>;

    /// Live sessions of an account
    async fn list_sessions(&self, account_id: i64) -> AppResult<Vec<Session>>;
}

/// Tunables for [`SessionManager`].
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl: Duration,
    /// Refresh `last_used` on every successful lookup
    pub track_last_used: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(SESSION_TTL_SECONDS),
            track_last_used: true,
        }
    }
}

/// Fresh random session key.
pub fn generate_session_key() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LENGTH)
        .map(char::from)
        .collect()
}

pub struct SessionManager {
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
}

impl SessionManager {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            sessions,
            clock,
            settings,
        }
    }
}

#[async_trait]
impl SessionService for SessionManager {
    async fn create_session(&self, account_id: i64) -> AppResult<String> {
        let now = self.clock.now();
        let key = generate_session_key();

        self.sessions
            .create(Session::new(key.clone(), account_id, now, self.settings.ttl))
            .await?;

        tracing::debug!(
            session = session_key_prefix(&key),
            account_id,
            "session created"
        );
        Ok(key)
    }

    async fn get_account_id(&self, token: &str) -> AppResult<i64> {
        let now = self.clock.now();
        let session = self.sessions.find_live(token, now).await?.ok_or_not_found()?;

        if self.settings.track_last_used {
            self.sessions.touch(token, now).await?;
        }

        Ok(session.user_id)
    }

    async fn delete_session(&self, token: &str) -> AppResult<()> {
        let now = self.clock.now();
        let session = self.sessions.find_live(token, now).await?.ok_or_not_found()?;

        // A concurrent logout may win between the lookup and the update
        if self.sessions.expire(token, now).await? == 0 {
            return Err(AppError::NotFound);
        }

        tracing::debug!(
            session = session_key_prefix(token),
            account_id = session.user_id,
            "session expired by logout"
        );
        Ok(())
    }

    async fn hard_delete_expired_sessions(&self) -> AppResult<u64> {
        let removed = self.sessions.delete_expired(self.clock.now()).await?;
        tracing::info!(removed, "expired sessions purged");
        Ok(removed)
    }

    async fn hard_delete_inactive_sessions(&self) -> AppResult<u64> {
        let cutoff = self
            .clock
            .now()
            .checked_sub_signed(self.settings.ttl)
            .ok_or_else(|| AppError::internal("session TTL is out of range"))?;
        let removed = self.sessions.delete_idle(cutoff).await?;
        tracing::info!(removed, %cutoff, "inactive sessions purged");
        Ok(removed)
    }

    async fn hard_delete_idle_sessions(&self, idle_for: Duration) -> AppResult<u64> {
        let window = idle_for.max(Duration::days(MIN_INACTIVE_SWEEP_DAYS));
        let cutoff = self
            .clock
            .now()
            .checked_sub_signed(window)
            .ok_or_else(|| AppError::bad_request("days is out of range"))?;
        let removed = self.sessions.delete_idle(cutoff).await?;
        tracing::info!(removed, idle_days = window.num_days(), "idle sessions purged");
        Ok(removed)
    }

    async fn list_sessions(&self, account_id: i64) -> AppResult<Vec<Session>> {
        self.sessions
            .list_for_account(account_id, self.clock.now())
            .await
    }
}
