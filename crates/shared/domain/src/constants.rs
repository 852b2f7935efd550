//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Sessions
// =============================================================================

/// Session lifetime: one year
pub const SESSION_TTL_SECONDS: i64 = 31_536_000;

/// Longest configurable session lifetime, in days
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

/// Length of the opaque session key
pub const SESSION_KEY_LENGTH: usize = 64;

/// Characters of a session key that may appear in logs
pub const SESSION_KEY_LOG_PREFIX: usize = 5;

/// Smallest idle window accepted by the inactive-session sweep
pub const MIN_INACTIVE_SWEEP_DAYS: i64 = 7;

/// Seconds per day
pub const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// Signed tokens
// =============================================================================

/// Email verification token lifetime: 7 days
pub const VERIFICATION_TOKEN_TTL_SECONDS: i64 = 604_800;

/// Password reset token lifetime: 1 day
pub const PASSWORD_RESET_TOKEN_TTL_SECONDS: i64 = 86_400;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Transport
// =============================================================================

/// Cookie carrying the session key
pub const SESSION_COOKIE_NAME: &str = "token";

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Header marking service-to-service calls
pub const INTERNAL_CALL_HEADER: &str = "internal-call";

/// Header carrying the admin API key
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Shorten a session key for log output.
pub fn session_key_prefix(key: &str) -> &str {
    match key.char_indices().nth(SESSION_KEY_LOG_PREFIX) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}
