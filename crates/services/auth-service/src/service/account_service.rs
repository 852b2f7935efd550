//! Account flows: login, registration, password reset and verification.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::clock::Clock;
use super::mailer::Mailer;
use super::session_service::SessionService;
use super::token_service::TokenService;
use crate::repository::AccountRepository;
use common::{AppError, AppResult, OptionExt};
use domain::{Password, TokenKind, TokenVerdict};

/// Hash verified against when the email is unknown, so both failure paths
/// cost one Argon2 verification.
static DUMMY_PASSWORD: Lazy<Password> = Lazy::new(|| {
    Password::new("login-timing-equalizer").unwrap_or_else(|_| {
        Password::from_hash(
            "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$ZHVtbXloYXNoMTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMg",
        )
    })
});

/// User-facing account operations.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Check credentials and open a session
    async fn login(&self, email: &str, password: &str) -> AppResult<String>;

    /// Create an inactive account, open a session and send the verification email
    async fn register(&self, email: &str, password: &str) -> AppResult<String>;

    /// Email a password-reset link
    async fn request_password_reset(&self, email: &str) -> AppResult<()>;

    /// Replace the password of the reset token's account
    async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()>;

    /// Mark the verification token's account active
    async fn verify_account(&self, token: &str) -> AppResult<()>;

    /// End a session
    async fn logout(&self, session_token: &str) -> AppResult<()>;
}

pub struct AccountManager {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<dyn SessionService>,
    tokens: Arc<dyn TokenService>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
}

impl AccountManager {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionService>,
        tokens: Arc<dyn TokenService>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            tokens,
            mailer,
            clock,
        }
    }

    /// Account id from a token of the expected kind, or `InvalidToken`.
    async fn redeem(&self, token: &str, kind: TokenKind) -> AppResult<i64> {
        match self.tokens.validate(token, kind).await {
            TokenVerdict::Valid(account_id) => Ok(account_id),
            TokenVerdict::WrongKind(account_id) => {
                tracing::warn!(account_id, expected = %kind, "token presented for another flow");
                Err(AppError::InvalidToken)
            }
            TokenVerdict::Invalid => Err(AppError::InvalidToken),
        }
    }

    /// Best effort: a failed revocation leaves the token usable until expiry.
    async fn consume(&self, token: &str, account_id: i64) {
        if let Err(e) = self.tokens.revoke(token).await {
            tracing::error!(account_id, error = %e, "failed to revoke consumed token");
        }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let account = self.accounts.find_by_email(email).await?;

        let stored = match &account {
            Some(account) => Password::from_hash(account.password_hash.as_str()),
            None => DUMMY_PASSWORD.clone(),
        };
        let password_valid = stored.verify(password);

        let account = match account {
            Some(account) if password_valid => account,
            Some(account) => {
                tracing::debug!(account_id = account.id, "login rejected: wrong password");
                return Err(AppError::InvalidCredentials);
            }
            None => {
                tracing::debug!("login rejected: unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.sessions.create_session(account.id).await?;
        tracing::info!(account_id = account.id, "login succeeded");
        Ok(token)
    }

    async fn register(&self, email: &str, password: &str) -> AppResult<String> {
        // Soft-deleted accounts still own their email
        if self
            .accounts
            .find_by_email_with_deleted(email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateAccount);
        }

        let password_hash = Password::new(password)?.into_string();
        let account = self
            .accounts
            .create(email.to_string(), password_hash, self.clock.now())
            .await?;

        let session = self.sessions.create_session(account.id).await?;

        match self.tokens.issue_verification(account.id) {
            Ok(token) => {
                if let Err(e) = self.mailer.send_verification(&account.email, &token).await {
                    tracing::warn!(account_id = account.id, error = %e, "verification email not sent");
                }
            }
            Err(e) => {
                tracing::warn!(account_id = account.id, error = %e, "verification token not issued");
            }
        }

        tracing::info!(account_id = account.id, "account registered");
        Ok(session)
    }

    async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let account = self.accounts.find_by_email(email).await?.ok_or_not_found()?;

        let token = self.tokens.issue_password_reset(account.id)?;
        self.mailer.send_password_reset(&account.email, &token).await?;

        tracing::info!(account_id = account.id, active = account.active, "password reset requested");
        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let account_id = self.redeem(token, TokenKind::PasswordReset).await?;

        let password_hash = Password::new(new_password)?.into_string();
        self.accounts
            .update_password(account_id, password_hash, self.clock.now())
            .await?;

        self.consume(token, account_id).await;
        tracing::info!(account_id, "password reset");
        Ok(())
    }

    async fn verify_account(&self, token: &str) -> AppResult<()> {
        let account_id = self.redeem(token, TokenKind::Verification).await?;

        let account = self.accounts.find_by_id(account_id).await?.ok_or_not_found()?;
        if !account.is_verified() {
            self.accounts
                .set_active(account_id, true, self.clock.now())
                .await?;
            tracing::info!(account_id, "account verified");
        }

        self.consume(token, account_id).await;
        Ok(())
    }

    async fn logout(&self, session_token: &str) -> AppResult<()> {
        self.sessions.delete_session(session_token).await
    }
}
