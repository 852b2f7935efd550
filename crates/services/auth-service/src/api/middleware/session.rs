//! Session-key authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use common::auth::session_token;
use common::AppError;

/// Account resolved from the caller's session key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentAccount {
    pub id: i64,
}

/// Resolves the `token` cookie (or Bearer header) to an account and injects
/// [`CurrentAccount`] into the request extensions.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;

    let id = state.sessions.get_account_id(&token).await?;
    request.extensions_mut().insert(CurrentAccount { id });

    Ok(next.run(request).await)
}
