//! Serve command - starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, ApiSettings, AppState};
use crate::cli::ServeArgs;
use crate::config::AuthServiceConfig;
use crate::container::ServiceContainer;
use crate::infra::Database;
use common::{AppError, AppResult};

pub async fn execute(args: ServeArgs, config: AuthServiceConfig) -> AppResult<()> {
    tracing::info!("Starting auth service...");

    let db = Database::connect(&config.database_url).await?;
    let services = ServiceContainer::from_config(&config, &db).await?;

    let settings = ApiSettings {
        admin_api_key: config.admin_api_key.clone(),
        secure_cookies: config.secure_cookies,
    };
    if settings.admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY not set, admin endpoints are disabled");
    }

    let state = AppState::new(services.accounts, services.sessions, Arc::new(db), settings);
    let app = create_router(state);

    let host = args.host.unwrap_or(config.host);
    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Auth service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Auth service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
