//! OpenAPI documentation served at `/swagger-ui`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler, health_handler, session_handler};
use crate::api::response::{ApiMessage, SessionSummary, SweepResponse, TokenResponse, ValidateResponse};
use domain::{ADMIN_KEY_HEADER, SESSION_COOKIE_NAME};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace Auth Service",
        version = "0.1.0",
        description = "Sessions, registration, password reset and account verification"
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::register,
        auth_handler::logout,
        auth_handler::request_password_reset,
        auth_handler::reset_password,
        auth_handler::verify_account,
        session_handler::validate,
        session_handler::list_sessions,
        admin_handler::purge_expired,
        admin_handler::purge_inactive,
        health_handler::health_check,
    ),
    components(
        schemas(
            auth_handler::LoginRequest,
            auth_handler::RegisterRequest,
            auth_handler::TokenRequest,
            auth_handler::PasswordResetRequest,
            auth_handler::NewPasswordRequest,
            ApiMessage,
            TokenResponse,
            ValidateResponse,
            SessionSummary,
            SweepResponse,
            health_handler::HealthResponse,
            health_handler::ServiceHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, registration and verification"),
        (name = "Password", description = "Password reset"),
        (name = "Sessions", description = "Session lookups"),
        (name = "Admin", description = "Session maintenance"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Session cookie, bearer key and admin key schemes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Session key obtained from /login"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_KEY_HEADER))),
            );
        }
    }
}
