//! Session validation for services that sit behind the auth service.
//!
//! Other marketplace services never read the sessions table. They forward the
//! caller's session key to the auth service's `POST /validate` endpoint and
//! trust the account id it returns.

use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use domain::{session_key_prefix, INTERNAL_CALL_HEADER};
use serde::{Deserialize, Serialize};

use crate::auth::{is_internal_call, session_token};
use crate::config::SessionClientConfig;
use crate::error::{AppError, AppResult};
use crate::http::JsonClient;

/// Account that owns the session presented with the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateResponse {
    user_id: i64,
}

/// HTTP client for the auth service's validate endpoint.
#[derive(Clone)]
pub struct SessionValidator {
    client: JsonClient,
    validate_url: String,
}

impl SessionValidator {
    pub fn new(config: &SessionClientConfig) -> AppResult<Self> {
        Ok(Self {
            client: JsonClient::new(Duration::from_millis(config.timeout_ms))?,
            validate_url: config.validate_url.clone(),
        })
    }

    /// Resolve a session key to its account.
    ///
    /// Unknown and expired sessions surface as `Unauthorized`; any other
    /// non-success status means the auth service itself is unhealthy.
    pub async fn validate(&self, token: &str) -> AppResult<AuthenticatedAccount> {
        let mut headers = HeaderMap::new();
        headers.insert(INTERNAL_CALL_HEADER, HeaderValue::from_static("true"));

        let reply = self
            .client
            .post_json::<_, ValidateResponse>(&self.validate_url, &ValidateRequest { token }, headers)
            .await?;

        match reply.status {
            status if status.is_success() => reply
                .body
                .map(|body| AuthenticatedAccount { id: body.user_id })
                .ok_or_else(|| AppError::internal("validate returned an empty body")),
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                tracing::debug!(
                    session = session_key_prefix(token),
                    "auth service rejected session"
                );
                Err(AppError::Unauthorized)
            }
            status => Err(AppError::service_unavailable(format!("auth ({})", status))),
        }
    }
}

/// Middleware that requires a live session.
///
/// Inserts [`AuthenticatedAccount`] into the request extensions.
/// Requests marked `Internal-Call: true` pass through unauthenticated.
pub async fn require_session(
    State(validator): State<SessionValidator>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_internal_call(request.headers()) {
        return Ok(next.run(request).await);
    }

    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let account = validator.validate(&token).await?;

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::header::COOKIE,
        middleware,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn fake_validate(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        use axum::response::IntoResponse;

        if !is_internal_call(&headers) {
            return StatusCode::FORBIDDEN.into_response();
        }
        match body["token"].as_str() {
            Some("good-token") => Json(json!({ "userId": 42 })).into_response(),
            Some("broken-auth") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            _ => StatusCode::UNAUTHORIZED.into_response(),
        }
    }

    async fn spawn_auth_service() -> SessionValidator {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/validate", post(fake_validate));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        SessionValidator::new(&SessionClientConfig {
            validate_url: format!("http://{}/validate", addr),
            timeout_ms: 2000,
        })
        .unwrap()
    }

    async fn whoami(account: Option<axum::Extension<AuthenticatedAccount>>) -> String {
        match account {
            Some(axum::Extension(account)) => account.id.to_string(),
            None => "internal".to_string(),
        }
    }

    fn protected_app(validator: SessionValidator) -> Router {
        Router::new()
            .route("/orders", get(whoami))
            .route_layer(middleware::from_fn_with_state(validator, require_session))
    }

    async fn call(app: Router, request: axum::http::Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_cookie_injects_account() {
        let app = protected_app(spawn_auth_service().await);
        let request = axum::http::Request::get("/orders")
            .header(COOKIE, "token=good-token")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let app = protected_app(spawn_auth_service().await);
        let request = axum::http::Request::get("/orders")
            .body(Body::empty())
            .unwrap();

        let (status, _) = call(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let app = protected_app(spawn_auth_service().await);
        let request = axum::http::Request::get("/orders")
            .header("authorization", "Bearer stale-token")
            .body(Body::empty())
            .unwrap();

        let (status, _) = call(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_service_failure_is_unavailable() {
        let app = protected_app(spawn_auth_service().await);
        let request = axum::http::Request::get("/orders")
            .header(COOKIE, "token=broken-auth")
            .body(Body::empty())
            .unwrap();

        let (status, _) = call(app, request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_internal_call_bypasses_validation() {
        let app = protected_app(spawn_auth_service().await);
        let request = axum::http::Request::get("/orders")
            .header(INTERNAL_CALL_HEADER, "true")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "internal");
    }
}
