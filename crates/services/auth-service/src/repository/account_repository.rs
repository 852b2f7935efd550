//! Account credential repository with soft delete support.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::Account;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Credential store.
///
/// Query methods exclude soft-deleted records unless named `*_with_deleted`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find a present account by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>>;

    /// Find a present account by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find an account by email including soft-deleted rows
    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<Account>>;

    /// Insert an inactive account. Fails with `DuplicateAccount` if the email is taken.
    async fn create(
        &self,
        email: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> AppResult<Account>;

    /// Replace the stored password hash
    async fn update_password(
        &self,
        id: i64,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Set the verified flag
    async fn set_active(&self, id: i64, active: bool, now: DateTime<Utc>) -> AppResult<()>;
}

/// SeaORM-backed credential store
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    classify_insert_error(err.sql_err(), err)
}

/// A unique violation on insert can only be the email index.
fn classify_insert_error(violation: Option<SqlErr>, err: DbErr) -> AppError {
    match violation {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateAccount,
        _ => AppError::from(err),
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id)
            .filter(account::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .filter(account::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        let active_model = ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            active: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(map_insert_error)?;
        Ok(Account::from(model))
    }

    async fn update_password(
        &self,
        id: i64,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = AccountEntity::update_many()
            .col_expr(account::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(account::Column::UpdatedAt, Expr::value(now))
            .filter(account::Column::Id.eq(id))
            .filter(account::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool, now: DateTime<Utc>) -> AppResult<()> {
        let result = AccountEntity::update_many()
            .col_expr(account::Column::Active, Expr::value(active))
            .col_expr(account::Column::UpdatedAt, Expr::value(now))
            .filter(account::Column::Id.eq(id))
            .filter(account::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Statement};

    fn row(id: i64, email: &str) -> account::Model {
        let now = Utc::now();
        account::Model {
            id,
            email: email.to_string(),
            password_hash: "$argon2id$stored".to_string(),
            active: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn statements(db: DatabaseConnection) -> Vec<Statement> {
        db.into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().to_vec())
            .collect()
    }

    #[tokio::test]
    async fn test_find_by_email_excludes_soft_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(3, "buyer@example.com")]])
            .into_connection();

        let account = AccountStore::new(db.clone())
            .find_by_email("buyer@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.id, 3);

        let log = statements(db);
        assert!(log[0].sql.contains(r#""auth"."email" = "#));
        assert!(log[0].sql.contains(r#""auth"."deleted_at" IS NULL"#));
    }

    #[tokio::test]
    async fn test_find_by_id_excludes_soft_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<account::Model>::new()])
            .into_connection();

        let found = AccountStore::new(db.clone()).find_by_id(3).await.unwrap();
        assert!(found.is_none());

        let log = statements(db);
        assert!(log[0].sql.contains(r#""auth"."id" = "#));
        assert!(log[0].sql.contains(r#""auth"."deleted_at" IS NULL"#));
    }

    #[tokio::test]
    async fn test_find_by_email_with_deleted_has_no_deleted_filter() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(3, "buyer@example.com")]])
            .into_connection();

        AccountStore::new(db.clone())
            .find_by_email_with_deleted("buyer@example.com")
            .await
            .unwrap();

        let log = statements(db);
        assert!(!log[0].sql.contains("IS NULL"));
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(11, "new@example.com")]])
            .into_connection();

        let account = AccountStore::new(db.clone())
            .create(
                "new@example.com".to_string(),
                "$argon2id$stored".to_string(),
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(account.id, 11);
        assert!(!account.active);

        let log = statements(db);
        assert!(log[0].sql.starts_with(r#"INSERT INTO "auth""#));
    }

    #[tokio::test]
    async fn test_create_passes_through_other_failures() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let result = AccountStore::new(db)
            .create(
                "new@example.com".to_string(),
                "$argon2id$stored".to_string(),
                Utc::now(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[test]
    fn test_unique_violation_is_duplicate_account() {
        let err = classify_insert_error(
            Some(SqlErr::UniqueConstraintViolation("auth_email_key".to_string())),
            DbErr::Custom("duplicate key".to_string()),
        );
        assert!(matches!(err, AppError::DuplicateAccount));

        let err = classify_insert_error(
            Some(SqlErr::ForeignKeyConstraintViolation("fk".to_string())),
            DbErr::Custom("fk".to_string()),
        );
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_password_on_missing_account_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = AccountStore::new(db.clone())
            .update_password(3, "$argon2id$new".to_string(), Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));

        let log = statements(db);
        assert!(log[0].sql.starts_with(r#"UPDATE "auth" SET "password_hash" = "#));
        assert!(log[0].sql.contains(r#""auth"."deleted_at" IS NULL"#));
    }
}
