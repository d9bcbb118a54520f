use crate::domains::user::types::{User, UserRow};
use crate::errors::{DbError, DomainError, DomainResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

/// Repository for authentication-related persistence
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Find an account by email for credential verification
    async fn find_user_by_email(&self, email: &str) -> DomainResult<User>;

    /// Record a login attempt, successful or not
    async fn log_login_attempt(
        &self,
        email: &str,
        success: bool,
        user_id: Option<Uuid>,
    ) -> Result<(), DbError>;

    /// Update the last login timestamp
    async fn update_last_login(&self, user_id: Uuid) -> Result<(), DbError>;
}

/// SQLite implementation of AuthRepository
pub struct SqliteAuthRepository {
    pool: SqlitePool,
}

impl SqliteAuthRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for SqliteAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> DomainResult<User> {
        let row = query_as::<_, UserRow>(
            "SELECT * FROM users WHERE email = ? AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?
        .ok_or_else(|| {
            DomainError::Database(DbError::NotFound("User".to_string(), email.to_string()))
        })?;

        row.into_entity()
    }

    async fn log_login_attempt(
        &self,
        email: &str,
        success: bool,
        user_id: Option<Uuid>,
    ) -> Result<(), DbError> {
        query(
            "INSERT INTO login_attempts (email, user_id, success, attempted_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(user_id.map(|id| id.to_string()))
        .bind(success as i64)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_last_login(&self, user_id: Uuid) -> Result<(), DbError> {
        query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
