//! Response bodies shared by the auth handlers.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use domain::{session_key_prefix, Session};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status message body: `{ code, type, message }`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiMessage {
    #[schema(example = 200)]
    pub code: u16,
    #[serde(rename = "type")]
    #[schema(example = "success")]
    pub kind: String,
    pub message: String,
}

impl ApiMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            kind: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            kind: "error".to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Session key returned by login and registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Account resolved from a session key
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub user_id: i64,
}

/// Result of an administrative sweep
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SweepResponse {
    pub removed: u64,
    pub message: String,
}

/// One live session, with the key shortened
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub key_prefix: String,
    pub last_used: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            key_prefix: session_key_prefix(&session.session_key).to_string(),
            last_used: session.last_used,
            expires_at: session.expires_at,
            created_at: session.created_at,
        }
    }
}
