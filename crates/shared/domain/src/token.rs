//! Signed capability tokens: kinds, claims and validation verdicts.

use serde::{Deserialize, Serialize};

use crate::constants::{PASSWORD_RESET_TOKEN_TTL_SECONDS, VERIFICATION_TOKEN_TTL_SECONDS};

/// Purpose a signed token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Verification,
    PasswordReset,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Verification => "verification",
            TokenKind::PasswordReset => "password_reset",
        }
    }

    /// Default lifetime for tokens of this kind.
    pub fn ttl_seconds(&self) -> i64 {
        match self {
            TokenKind::Verification => VERIFICATION_TOKEN_TTL_SECONDS,
            TokenKind::PasswordReset => PASSWORD_RESET_TOKEN_TTL_SECONDS,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim set carried by a signed token.
///
/// Timestamps are Unix seconds. An unknown `type` fails deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: i64, kind: TokenKind, now: i64, ttl_seconds: i64) -> Self {
        Self {
            user_id,
            kind,
            iat: now,
            nbf: now,
            exp: now + ttl_seconds,
        }
    }

    /// Expired at or after `exp`, not yet valid before `nbf`.
    pub fn is_current(&self, now: i64) -> bool {
        self.nbf <= now && now < self.exp
    }
}

/// Outcome of validating a signed token against an expected kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVerdict {
    /// Signature, time window and kind all agree
    Valid(i64),
    /// Authentic and current, but issued for another purpose
    WrongKind(i64),
    /// Unparseable, forged, expired, not yet valid or revoked
    Invalid,
}

impl TokenVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenVerdict::Valid(_))
    }

    /// Subject account; 0 when nothing could be extracted.
    ///
    /// A non-zero id on a `WrongKind` verdict is for diagnostics only.
    pub fn account_id(&self) -> i64 {
        match self {
            TokenVerdict::Valid(id) | TokenVerdict::WrongKind(id) => *id,
            TokenVerdict::Invalid => 0,
        }
    }

    /// `(valid, account_id)` pair.
    pub fn as_pair(&self) -> (bool, i64) {
        (self.is_valid(), self.account_id())
    }
}
