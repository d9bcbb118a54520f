use crate::domains::user::types::{NewUser, UpdateUser, User, UserRow};
use crate::errors::{DbError, DomainError, DomainResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<User>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DomainResult<User>;

    /// Find all users belonging to an organization
    async fn find_all_in_org(&self, casa_org_id: Uuid) -> DomainResult<Vec<User>>;

    /// Create a new user. `user.password` must already be hashed.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    /// Update profile fields. This statement never touches `active` or
    /// `role`; those change only through their dedicated operations.
    async fn update(&self, id: Uuid, update: UpdateUser) -> DomainResult<User>;

    /// Flip the activation flag. The only write path for `active`.
    async fn set_active(&self, id: Uuid, active: bool) -> DomainResult<User>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DomainResult<()>;

    /// Stamp a fresh invitation token
    async fn set_invitation_token(&self, id: Uuid, token: &str) -> DomainResult<User>;

    /// Check if email is unique
    async fn is_email_unique(&self, email: &str, exclude_id: Option<Uuid>) -> DomainResult<bool>;
}

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: UserRow) -> DomainResult<User> {
        row.into_entity()
    }

    async fn find_by_id_with_tx<'t>(
        &self,
        id: Uuid,
        tx: &mut Transaction<'t, Sqlite>,
    ) -> DomainResult<User> {
        let row = query_as::<_, UserRow>("SELECT * FROM users WHERE id = ? AND deleted_at IS NULL")
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("User".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<User> {
        let row = query_as::<_, UserRow>("SELECT * FROM users WHERE id = ? AND deleted_at IS NULL")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("User".to_string(), id))?;

        Self::map_row_to_entity(row)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<User> {
        let row =
            query_as::<_, UserRow>("SELECT * FROM users WHERE email = ? AND deleted_at IS NULL")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Database(DbError::from(e)))?
                .ok_or_else(|| {
                    DomainError::Database(DbError::NotFound(
                        "User".to_string(),
                        email.to_string(),
                    ))
                })?;

        Self::map_row_to_entity(row)
    }

    async fn find_all_in_org(&self, casa_org_id: Uuid) -> DomainResult<Vec<User>> {
        let rows = query_as::<_, UserRow>(
            "SELECT * FROM users WHERE casa_org_id = ? AND deleted_at IS NULL ORDER BY display_name",
        )
        .bind(casa_org_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn create(&self, user: NewUser) -> DomainResult<User> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO users (id, casa_org_id, email, display_name, password_hash, role, active,
                                created_at, updated_at, created_by_user_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(user.casa_org_id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password)
        .bind(&user.role)
        .bind(user.active as i64)
        .bind(&now)
        .bind(&now)
        .bind(user.created_by_user_id.map(|u| u.to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DomainError::Validation(
                crate::errors::ValidationError::unique("email"),
            ),
            _ => DomainError::Database(DbError::from(e)),
        })?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update: UpdateUser) -> DomainResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        // Existence check also gives the EntityNotFound error the service expects
        let current = self.find_by_id_with_tx(id, &mut tx).await?;

        let email = update.email.unwrap_or(current.email);
        let display_name = update.display_name.unwrap_or(current.display_name);
        let now = Utc::now().to_rfc3339();

        let result = query(
            "UPDATE users SET email = ?, display_name = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(&email)
        .bind(&display_name)
        .bind(&now)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DomainError::Validation(
                crate::errors::ValidationError::unique("email"),
            ),
            _ => DomainError::Database(DbError::from(e)),
        })?;

        if result.rows_affected() == 0 {
            let _ = tx.rollback().await;
            return Err(DomainError::EntityNotFound("User".to_string(), id));
        }

        let updated = self.find_by_id_with_tx(id, &mut tx).await?;
        tx.commit()
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        Ok(updated)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> DomainResult<User> {
        let now = Utc::now().to_rfc3339();

        let result = query(
            "UPDATE users SET active = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(active as i64)
        .bind(&now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("User".to_string(), id));
        }

        self.find_by_id(id).await
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DomainResult<()> {
        let now = Utc::now().to_rfc3339();

        let result = query(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(password_hash)
        .bind(&now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("User".to_string(), id));
        }

        Ok(())
    }

    async fn set_invitation_token(&self, id: Uuid, token: &str) -> DomainResult<User> {
        let now = Utc::now().to_rfc3339();

        let result = query(
            "UPDATE users SET invitation_token = ?, invitation_created_at = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(token)
        .bind(&now)
        .bind(&now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("User".to_string(), id));
        }

        self.find_by_id(id).await
    }

    async fn is_email_unique(&self, email: &str, exclude_id: Option<Uuid>) -> DomainResult<bool> {
        let count = match exclude_id {
            Some(id) => {
                query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE email = ? AND id != ? AND deleted_at IS NULL",
                )
                .bind(email)
                .bind(id.to_string())
                .fetch_one(&self.pool)
                .await
            }
            None => {
                query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE email = ? AND deleted_at IS NULL",
                )
                .bind(email)
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        Ok(count == 0)
    }
}
