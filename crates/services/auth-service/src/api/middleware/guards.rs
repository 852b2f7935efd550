//! Access guards for public-only and administrative routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::api::response::ApiMessage;
use crate::api::AppState;
use common::auth::{is_internal_call, session_cookie};
use common::AppError;
use domain::ADMIN_KEY_HEADER;

/// Rejects callers that already hold a session cookie.
///
/// Service-to-service calls marked `Internal-Call: true` pass through.
pub async fn public_only_middleware(request: Request, next: Next) -> Response {
    let headers = request.headers();

    if session_cookie(headers).is_some() && !is_internal_call(headers) {
        return ApiMessage::error(StatusCode::FORBIDDEN, "You are already authenticated")
            .into_response();
    }

    next.run(request).await
}

/// Requires `X-Admin-Key` to match the configured admin key.
pub async fn admin_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let expected = state
        .settings
        .admin_api_key
        .as_deref()
        .ok_or(AppError::Forbidden)?;

    let presented = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Forbidden)?;

    if !bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
        tracing::warn!("admin request with wrong key");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
