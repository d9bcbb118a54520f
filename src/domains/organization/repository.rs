use crate::domains::organization::types::{CasaOrg, CasaOrgRow, NewCasaOrg};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::validation::Validate;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

/// CASA organization repository trait
#[async_trait]
pub trait CasaOrgRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<CasaOrg>;
    async fn create(&self, new_org: NewCasaOrg) -> DomainResult<CasaOrg>;
}

/// SQLite implementation of CasaOrgRepository
pub struct SqliteCasaOrgRepository {
    pool: SqlitePool,
}

impl SqliteCasaOrgRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CasaOrgRepository for SqliteCasaOrgRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<CasaOrg> {
        let row = query_as::<_, CasaOrgRow>("SELECT * FROM casa_orgs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("CasaOrg".to_string(), id))?;

        row.into_entity()
    }

    async fn create(&self, new_org: NewCasaOrg) -> DomainResult<CasaOrg> {
        new_org.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query("INSERT INTO casa_orgs (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(&new_org.name)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    DomainError::Database(DbError::Conflict(format!(
                        "Organization name already taken: {}",
                        new_org.name
                    )))
                }
                _ => DomainError::Database(DbError::from(e)),
            })?;

        self.find_by_id(id).await
    }
}
