//! Sweep command - one-off session purge, suitable for cron.

use std::sync::Arc;

use chrono::Duration;

use crate::cli::SweepAction;
use crate::config::AuthServiceConfig;
use crate::container::session_manager;
use crate::infra::Database;
use crate::service::SystemClock;
use common::{AppError, AppResult};

pub async fn execute(action: SweepAction, config: AuthServiceConfig) -> AppResult<()> {
    let db = Database::connect(&config.database_url).await?;
    let sessions = session_manager(&config, &db, Arc::new(SystemClock));

    let removed = match action {
        SweepAction::Expired => sessions.hard_delete_expired_sessions().await?,
        SweepAction::Inactive { days: None } => sessions.hard_delete_inactive_sessions().await?,
        SweepAction::Inactive { days: Some(days) } => {
            let idle_for = Duration::try_days(days)
                .ok_or_else(|| AppError::bad_request("days is out of range"))?;
            sessions.hard_delete_idle_sessions(idle_for).await?
        }
    };

    println!("removed {} session(s)", removed);
    Ok(())
}
