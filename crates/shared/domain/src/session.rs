//! Session domain entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::session_key_prefix;

/// Proof that an account authenticated.
///
/// A session is live while `now < expires_at`. Logging out moves
/// `expires_at` to the logout instant; sweeps remove the row entirely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_key: String,
    pub user_id: i64,
    pub last_used: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_key", &format_args!("{}…", session_key_prefix(&self.session_key)))
            .field("user_id", &self.user_id)
            .field("last_used", &self.last_used)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    /// Build a fresh session starting at `now`.
    ///
    /// An expiry past the end of the calendar saturates at the latest instant.
    pub fn new(session_key: String, user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            session_key,
            user_id,
            last_used: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// True when the session has not been used since `cutoff`.
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_used < cutoff
    }
}
