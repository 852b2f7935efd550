//! Request helpers for locating the caller's session credential.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use domain::{BEARER_TOKEN_PREFIX, INTERNAL_CALL_HEADER, SESSION_COOKIE_NAME};

/// Session key from the `token` cookie, falling back to a Bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    session_cookie(headers).or_else(|| bearer_token(headers))
}

/// Session key from the `token` cookie only.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// True when the request carries `Internal-Call: true`.
pub fn is_internal_call(headers: &HeaderMap) -> bool {
    headers
        .get(INTERNAL_CALL_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
