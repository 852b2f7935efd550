//! Migrate command - database migration management.

use crate::cli::MigrateAction;
use crate::config::AuthServiceConfig;
use crate::infra::Database;
use common::AppResult;

pub async fn execute(action: MigrateAction, config: AuthServiceConfig) -> AppResult<()> {
    // Manual control: nothing runs on connect
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            tracing::info!("Migrations completed");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            tracing::info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                println!("{}: {}", name, if applied { "applied" } else { "pending" });
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed");
        }
    }

    Ok(())
}
