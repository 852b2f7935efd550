//! Maintenance sweeps over the session table.

use axum::{
    extract::{Query, State},
    middleware,
    response::Json,
    routing::delete,
    Router,
};
use chrono::Duration;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::middleware::admin_key_middleware;
use crate::api::response::SweepResponse;
use crate::api::AppState;
use common::{AppError, AppResult};

/// Inactive sweep parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InactiveQuery {
    /// Idle window in days (at least 7); defaults to the session lifetime
    pub days: Option<i64>,
}

pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/sessions/expired", delete(purge_expired))
        .route("/sessions/inactive", delete(purge_inactive))
        .route_layer(middleware::from_fn_with_state(state, admin_key_middleware))
}

/// Remove sessions past their expiry
#[utoipa::path(
    delete,
    path = "/admin/sessions/expired",
    tag = "Admin",
    responses(
        (status = 200, description = "Sweep finished", body = SweepResponse),
        (status = 403, description = "Missing or wrong admin key")
    ),
    security(("admin_key" = []))
)]
pub async fn purge_expired(State(state): State<AppState>) -> AppResult<Json<SweepResponse>> {
    let removed = state.sessions.hard_delete_expired_sessions().await?;

    Ok(Json(SweepResponse {
        removed,
        message: "Expired sessions removed".to_string(),
    }))
}

/// Remove sessions that have not been used recently
#[utoipa::path(
    delete,
    path = "/admin/sessions/inactive",
    tag = "Admin",
    params(InactiveQuery),
    responses(
        (status = 200, description = "Sweep finished", body = SweepResponse),
        (status = 400, description = "Invalid day count"),
        (status = 403, description = "Missing or wrong admin key")
    ),
    security(("admin_key" = []))
)]
pub async fn purge_inactive(
    State(state): State<AppState>,
    Query(query): Query<InactiveQuery>,
) -> AppResult<Json<SweepResponse>> {
    let removed = match query.days {
        Some(days) => {
            let idle_for = Duration::try_days(days)
                .ok_or_else(|| AppError::bad_request("days is out of range"))?;
            state.sessions.hard_delete_idle_sessions(idle_for).await?
        }
        None => state.sessions.hard_delete_inactive_sessions().await?,
    };

    Ok(Json(SweepResponse {
        removed,
        message: "Inactive sessions removed".to_string(),
    }))
}
