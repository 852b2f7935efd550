//! In-memory stores and a fully wired service stack for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use auth_service_lib::api::{ApiSettings, AppState, HealthProbe};
use auth_service_lib::repository::{AccountRepository, SessionRepository};
use auth_service_lib::service::{
    AccountManager, AccountService, Clock, Mailer, ManualClock, MemoryDenylist, SessionManager,
    SessionService, SessionSettings, TokenIssuer,
};
use common::{AppError, AppResult};
use domain::{Account, Session};
use jsonwebtoken::Algorithm;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ADMIN_KEY: &str = "admin-test-key";

/// Fixed starting instant so expiry arithmetic is reproducible.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

// =============================================================================
// Stores
// =============================================================================

#[derive(Default)]
pub struct InMemoryAccounts {
    rows: Mutex<Vec<Account>>,
}

impl InMemoryAccounts {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: i64) -> Option<Account> {
        self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }

    pub fn soft_delete(&self, id: i64, at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(account) = rows.iter_mut().find(|a| a.id == id) {
            account.deleted_at = Some(at);
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.id == id && a.deleted_at.is_none()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|a| a.email == email && a.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<Account>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.email == email).cloned())
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.email == email) {
            return Err(AppError::DuplicateAccount);
        }

        let account = Account {
            id: rows.len() as i64 + 1,
            email,
            password_hash,
            active: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(account.clone());
        Ok(account)
    }

    async fn update_password(
        &self,
        id: i64,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let account = rows
            .iter_mut()
            .find(|a| a.id == id && a.deleted_at.is_none())
            .ok_or(AppError::NotFound)?;
        account.password_hash = password_hash;
        account.updated_at = now;
        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool, now: DateTime<Utc>) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let account = rows
            .iter_mut()
            .find(|a| a.id == id && a.deleted_at.is_none())
            .ok_or(AppError::NotFound)?;
        account.active = active;
        account.updated_at = now;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySessions {
    rows: Mutex<Vec<Session>>,
}

impl InMemorySessions {
    /// Rows present, live or not.
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, key: &str) -> Option<Session> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.session_key == key)
            .cloned()
    }

    pub fn set_last_used(&self, key: &str, at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(session) = rows.iter_mut().find(|s| s.session_key == key) {
            session.last_used = at;
        }
    }

    pub fn set_expires_at(&self, key: &str, at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(session) = rows.iter_mut().find(|s| s.session_key == key) {
            session.expires_at = at;
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessions {
    async fn create(&self, session: Session) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.session_key == session.session_key) {
            return Err(AppError::internal("duplicate session key"));
        }
        rows.push(session);
        Ok(())
    }

    async fn find_live(&self, key: &str, now: DateTime<Utc>) -> AppResult<Option<Session>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|s| s.session_key == key && s.is_live(now))
            .cloned())
    }

    async fn touch(&self, key: &str, now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|s| s.session_key == key && s.is_live(now))
        {
            Some(session) => {
                session.last_used = now;
                session.updated_at = now;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn expire(&self, key: &str, now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|s| s.session_key == key && s.is_live(now))
        {
            Some(session) => {
                session.expires_at = now;
                session.updated_at = now;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.expires_at >= now);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_idle(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| !s.is_idle_since(cutoff));
        Ok((before - rows.len()) as u64)
    }

    async fn list_for_account(&self, user_id: i64, now: DateTime<Utc>) -> AppResult<Vec<Session>> {
        let rows = self.rows.lock().unwrap();
        let mut live: Vec<Session> = rows
            .iter()
            .filter(|s| s.user_id == user_id && s.is_live(now))
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(live)
    }
}

// =============================================================================
// Collaborators
// =============================================================================

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    verifications: Mutex<Vec<(String, String)>>,
    resets: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last_verification_token(&self) -> Option<String> {
        self.verifications.lock().unwrap().last().map(|(_, t)| t.clone())
    }

    pub fn last_reset_token(&self) -> Option<String> {
        self.resets.lock().unwrap().last().map(|(_, t)| t.clone())
    }

    pub fn reset_count(&self) -> usize {
        self.resets.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, email: &str, token: &str) -> AppResult<()> {
        self.verifications
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, token: &str) -> AppResult<()> {
        self.resets
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Health probe with a switchable outcome.
#[derive(Default)]
pub struct FakeHealth {
    down: Mutex<bool>,
}

impl FakeHealth {
    pub fn set_down(&self, down: bool) {
        *self.down.lock().unwrap() = down;
    }
}

#[async_trait]
impl HealthProbe for FakeHealth {
    async fn ping(&self) -> AppResult<()> {
        if *self.down.lock().unwrap() {
            Err(AppError::service_unavailable("database"))
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Harness
// =============================================================================

/// Real managers over in-memory stores, sharing one manual clock.
pub struct TestApp {
    pub clock: Arc<ManualClock>,
    pub accounts_store: Arc<InMemoryAccounts>,
    pub sessions_store: Arc<InMemorySessions>,
    pub mailer: Arc<RecordingMailer>,
    pub health: Arc<FakeHealth>,
    pub sessions: Arc<SessionManager>,
    pub accounts: Arc<AccountManager>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(SessionSettings::default())
    }

    pub fn with_settings(settings: SessionSettings) -> Self {
        let clock = Arc::new(ManualClock::new(epoch()));
        let accounts_store = Arc::new(InMemoryAccounts::default());
        let sessions_store = Arc::new(InMemorySessions::default());
        let mailer = Arc::new(RecordingMailer::default());

        let sessions = Arc::new(SessionManager::new(
            sessions_store.clone(),
            clock.clone(),
            settings,
        ));

        let tokens = Arc::new(TokenIssuer::new(
            TEST_SECRET.as_bytes(),
            Algorithm::HS256,
            clock.clone(),
            Arc::new(MemoryDenylist::new(clock.clone())),
        ));

        let accounts = Arc::new(AccountManager::new(
            accounts_store.clone(),
            sessions.clone(),
            tokens,
            mailer.clone(),
            clock.clone(),
        ));

        Self {
            clock,
            accounts_store,
            sessions_store,
            mailer,
            health: Arc::new(FakeHealth::default()),
            sessions,
            accounts,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub fn state(&self) -> AppState {
        let accounts: Arc<dyn AccountService> = self.accounts.clone();
        let sessions: Arc<dyn SessionService> = self.sessions.clone();

        AppState::new(
            accounts,
            sessions,
            self.health.clone(),
            ApiSettings {
                admin_api_key: Some(ADMIN_KEY.to_string()),
                secure_cookies: false,
            },
        )
    }
}
