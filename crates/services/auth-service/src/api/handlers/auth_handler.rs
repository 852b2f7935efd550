//! Login, registration, logout, password reset and verification.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::public_only_middleware;
use crate::api::response::{ApiMessage, TokenResponse};
use crate::api::AppState;
use common::auth::session_token;
use common::{AppError, AppResult};
use domain::SESSION_COOKIE_NAME;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "buyer@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "CorrectHorse1")]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "buyer@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "CorrectHorse1", min_length = 8)]
    pub password: String,
}

/// Session key in a request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "buyer@example.com")]
    pub email: String,
}

/// New password for a reset token
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub new_password: String,
}

pub fn auth_routes() -> Router<AppState> {
    // Only callers without a session may log in or register
    let public_only = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route_layer(middleware::from_fn(public_only_middleware));

    Router::new()
        .merge(public_only)
        .route("/logout", get(logout).post(logout))
        .route("/change-password", post(request_password_reset))
        .route("/change-password/:token", post(reset_password))
        .route("/verify/:token", get(verify_account))
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Log in and receive a session key
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Caller already holds a session", body = ApiMessage)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let token = state
        .accounts
        .login(&payload.email, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(token.clone(), state.settings.secure_cookies));
    Ok((jar, Json(TokenResponse { token })))
}

/// Create an account and receive a session key
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller already holds a session", body = ApiMessage),
        (status = 409, description = "Account already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<TokenResponse>)> {
    let token = state
        .accounts
        .register(&payload.email, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(token.clone(), state.settings.secure_cookies));
    Ok((StatusCode::CREATED, jar, Json(TokenResponse { token })))
}

/// End the caller's session
///
/// The key is read from the `token` cookie, a Bearer header, or a `{token}` body.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    request_body(content = TokenRequest, description = "Session key when no cookie is sent"),
    responses(
        (status = 200, description = "Logged out", body = ApiMessage),
        (status = 401, description = "Authentication failed")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Option<Json<TokenRequest>>,
) -> AppResult<(CookieJar, ApiMessage)> {
    let token = session_token(&headers)
        .or_else(|| body.map(|Json(req)| req.token))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    state.accounts.logout(&token).await?;

    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    Ok((jar, ApiMessage::success("Logged out")))
}

/// Email a password reset link
///
/// Answers the same way whether or not the email belongs to an account.
#[utoipa::path(
    post,
    path = "/change-password",
    tag = "Password",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = ApiMessage),
        (status = 400, description = "Validation error")
    )
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PasswordResetRequest>,
) -> AppResult<ApiMessage> {
    match state.accounts.request_password_reset(&payload.email).await {
        Ok(()) | Err(AppError::NotFound) => {}
        Err(e) => return Err(e),
    }

    Ok(ApiMessage::success(
        "If the account exists, a password reset link has been sent",
    ))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/change-password/{token}",
    tag = "Password",
    params(("token" = String, Path, description = "Password reset token")),
    request_body = NewPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiMessage),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(payload): ValidatedJson<NewPasswordRequest>,
) -> AppResult<ApiMessage> {
    state
        .accounts
        .reset_password(&token, &payload.new_password)
        .await?;

    Ok(ApiMessage::success("Password changed"))
}

/// Activate an account from its verification link
#[utoipa::path(
    get,
    path = "/verify/{token}",
    tag = "Authentication",
    params(("token" = String, Path, description = "Verification token")),
    responses(
        (status = 200, description = "Account verified", body = ApiMessage),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn verify_account(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<ApiMessage> {
    state.accounts.verify_account(&token).await?;

    Ok(ApiMessage::success("Account verified"))
}
