//! Outbound account email.

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the email-verification link
    async fn send_verification(&self, email: &str, token: &str) -> AppResult<()>;

    /// Send the password-reset link
    async fn send_password_reset(&self, email: &str, token: &str) -> AppResult<()>;
}

/// Writes messages to the log instead of delivering them.
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/auth/verify/{}", self.base_url, token)
    }

    pub fn password_reset_link(&self, token: &str) -> String {
        format!("{}/auth/reset-password/{}", self.base_url, token)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, email: &str, token: &str) -> AppResult<()> {
        tracing::info!(to = email, subject = "Verify your account", "email sent");
        tracing::debug!(link = %self.verification_link(token), "verification link");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, token: &str) -> AppResult<()> {
        tracing::info!(to = email, subject = "Reset your password", "email sent");
        tracing::debug!(link = %self.password_reset_link(token), "password reset link");
        Ok(())
    }
}
