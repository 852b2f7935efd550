//! Session repository.
//!
//! Liveness is always decided in the query (`expires_at > now`), so callers
//! cannot tell an expired row from a missing one. Both sweeps are single
//! bulk `DELETE` statements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::session::{self, ActiveModel, Entity as SessionEntity};
use common::AppResult;
use domain::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Session store.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session row
    async fn create(&self, session: Session) -> AppResult<()>;

    /// Find the session with `key` whose expiry is after `now`
    async fn find_live(&self, key: &str, now: DateTime<Utc>) -> AppResult<Option<Session>>;

    /// Set `last_used = now` on a live session; returns rows touched
    async fn touch(&self, key: &str, now: DateTime<Utc>) -> AppResult<u64>;

    /// Soft delete: force `expires_at = now` on a live session; returns rows touched
    async fn expire(&self, key: &str, now: DateTime<Utc>) -> AppResult<u64>;

    /// Remove every row with `expires_at < now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Remove every row with `last_used < cutoff`
    async fn delete_idle(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Live sessions owned by an account, newest first
    async fn list_for_account(&self, user_id: i64, now: DateTime<Utc>) -> AppResult<Vec<Session>>;
}

/// SeaORM-backed session store
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn create(&self, session: Session) -> AppResult<()> {
        let active_model = ActiveModel {
            session_key: Set(session.session_key),
            user_id: Set(session.user_id),
            last_used: Set(session.last_used),
            expires_at: Set(session.expires_at),
            created_at: Set(session.created_at),
            updated_at: Set(session.updated_at),
        };

        active_model.insert(&self.db).await?;
        Ok(())
    }

    async fn find_live(&self, key: &str, now: DateTime<Utc>) -> AppResult<Option<Session>> {
        let result = SessionEntity::find_by_id(key.to_owned())
            .filter(session::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await?;

        Ok(result.map(Session::from))
    }

    async fn touch(&self, key: &str, now: DateTime<Utc>) -> AppResult<u64> {
        let result = SessionEntity::update_many()
            .col_expr(session::Column::LastUsed, Expr::value(now))
            .col_expr(session::Column::UpdatedAt, Expr::value(now))
            .filter(session::Column::SessionKey.eq(key))
            .filter(session::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn expire(&self, key: &str, now: DateTime<Utc>) -> AppResult<u64> {
        let result = SessionEntity::update_many()
            .col_expr(session::Column::ExpiresAt, Expr::value(now))
            .col_expr(session::Column::UpdatedAt, Expr::value(now))
            .filter(session::Column::SessionKey.eq(key))
            .filter(session::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = SessionEntity::delete_many()
            .filter(session::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_idle(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = SessionEntity::delete_many()
            .filter(session::Column::LastUsed.lt(cutoff))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn list_for_account(&self, user_id: i64, now: DateTime<Utc>) -> AppResult<Vec<Session>> {
        let models = SessionEntity::find()
            .filter(session::Column::UserId.eq(user_id))
            .filter(session::Column::ExpiresAt.gt(now))
            .order_by_desc(session::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Session::from).collect())
    }
}
