//! Session lookups for other services and for the session owner.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use super::auth_handler::TokenRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{session_middleware, CurrentAccount};
use crate::api::response::{SessionSummary, ValidateResponse};
use crate::api::AppState;
use common::AppResult;

pub fn session_routes(state: AppState) -> Router<AppState> {
    let owned = Router::new()
        .route("/sessions", get(list_sessions))
        .route_layer(middleware::from_fn_with_state(state, session_middleware));

    Router::new()
        .route("/validate", post(validate))
        .merge(owned)
}

/// Resolve a session key to its account
#[utoipa::path(
    post,
    path = "/validate",
    tag = "Sessions",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Session is live", body = ValidateResponse),
        (status = 401, description = "Unknown or expired session")
    )
)]
pub async fn validate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenRequest>,
) -> AppResult<Json<ValidateResponse>> {
    let user_id = state.sessions.get_account_id(&payload.token).await?;

    Ok(Json(ValidateResponse { user_id }))
}

/// Live sessions of the calling account, newest first
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "Sessions",
    responses(
        (status = 200, description = "Live sessions", body = [SessionSummary]),
        (status = 401, description = "Authentication failed")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<Json<Vec<SessionSummary>>> {
    let sessions = state.sessions.list_sessions(current.id).await?;

    Ok(Json(sessions.iter().map(SessionSummary::from).collect()))
}
