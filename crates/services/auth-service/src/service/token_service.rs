//! Verification and password-reset tokens.
//!
//! Tokens are HMAC-signed compact JWS. Time checks run against the injected
//! clock rather than the library's own wall clock, and consumed tokens are
//! kept on a denylist until they would have expired.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::clock::Clock;
use super::denylist::TokenDenylist;
use common::AppResult;
use domain::{TokenClaims, TokenKind, TokenVerdict};

/// Signed token issuing and validation.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Sign a token of `kind` for `account_id`, valid for `ttl_seconds`
    fn issue(&self, account_id: i64, kind: TokenKind, ttl_seconds: i64) -> AppResult<String>;

    /// Check signature, time window, revocation and kind
    async fn validate(&self, token: &str, expected: TokenKind) -> TokenVerdict;

    /// Refuse this token from now until its own expiry
    async fn revoke(&self, token: &str) -> AppResult<()>;

    fn issue_verification(&self, account_id: i64) -> AppResult<String> {
        let kind = TokenKind::Verification;
        self.issue(account_id, kind, kind.ttl_seconds())
    }

    fn issue_password_reset(&self, account_id: i64) -> AppResult<String> {
        let kind = TokenKind::PasswordReset;
        self.issue(account_id, kind, kind.ttl_seconds())
    }
}

pub struct TokenIssuer {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
    denylist: Arc<dyn TokenDenylist>,
}

impl TokenIssuer {
    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        clock: Arc<dyn Clock>,
        denylist: Arc<dyn TokenDenylist>,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
            denylist,
        }
    }

    /// Verify the signature and decode claims, ignoring time and kind.
    fn decode_claims(&self, token: &str) -> Option<TokenClaims> {
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "signed token rejected");
                None
            }
        }
    }
}

/// Denylist key: the signature segment.
fn revocation_key(token: &str) -> &str {
    token.rsplit('.').next().unwrap_or(token)
}

#[async_trait]
impl TokenService for TokenIssuer {
    fn issue(&self, account_id: i64, kind: TokenKind, ttl_seconds: i64) -> AppResult<String> {
        let now = self.clock.now().timestamp();
        let claims = TokenClaims::new(account_id, kind, now, ttl_seconds);

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    async fn validate(&self, token: &str, expected: TokenKind) -> TokenVerdict {
        let Some(claims) = self.decode_claims(token) else {
            return TokenVerdict::Invalid;
        };

        if !claims.is_current(self.clock.now().timestamp()) {
            tracing::debug!(account_id = claims.user_id, kind = %claims.kind, "signed token outside its validity window");
            return TokenVerdict::Invalid;
        }

        match self.denylist.contains(revocation_key(token)).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!(account_id = claims.user_id, "signed token already consumed");
                return TokenVerdict::Invalid;
            }
            Err(e) => {
                tracing::error!(error = %e, "denylist lookup failed, rejecting token");
                return TokenVerdict::Invalid;
            }
        }

        if claims.kind != expected {
            tracing::warn!(
                account_id = claims.user_id,
                expected = %expected,
                actual = %claims.kind,
                "signed token used for the wrong purpose"
            );
            return TokenVerdict::WrongKind(claims.user_id);
        }

        TokenVerdict::Valid(claims.user_id)
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        let Some(claims) = self.decode_claims(token) else {
            return Ok(());
        };

        let remaining = claims.exp - self.clock.now().timestamp();
        if remaining <= 0 {
            return Ok(());
        }

        self.denylist
            .insert(revocation_key(token), remaining as u64)
            .await
    }
}
