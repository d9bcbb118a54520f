use crate::domains::casa_case::types::{
    CasaCase, CasaCaseRow, CaseAssignment, CaseAssignmentRow, NewCasaCase,
};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::validation::Validate;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, SqlitePool};
use uuid::Uuid;

/// Case repository trait
#[async_trait]
pub trait CasaCaseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<CasaCase>;

    async fn create(&self, new_case: NewCasaCase) -> DomainResult<CasaCase>;

    /// Cases a volunteer is actively assigned to
    async fn find_for_volunteer(&self, volunteer_id: Uuid) -> DomainResult<Vec<CasaCase>>;

    /// Assign a volunteer to a case
    async fn assign_volunteer(&self, case_id: Uuid, volunteer_id: Uuid)
        -> DomainResult<CaseAssignment>;

    /// Whether the volunteer has an active assignment to the case
    async fn is_assigned(&self, case_id: Uuid, volunteer_id: Uuid) -> DomainResult<bool>;
}

/// SQLite implementation of CasaCaseRepository
pub struct SqliteCasaCaseRepository {
    pool: SqlitePool,
}

impl SqliteCasaCaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CasaCaseRepository for SqliteCasaCaseRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<CasaCase> {
        let row = query_as::<_, CasaCaseRow>(
            "SELECT * FROM casa_cases WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?
        .ok_or_else(|| DomainError::EntityNotFound("CasaCase".to_string(), id))?;

        row.into_entity()
    }

    async fn create(&self, new_case: NewCasaCase) -> DomainResult<CasaCase> {
        new_case.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO casa_cases (id, casa_org_id, case_number, active, created_at, updated_at)
             VALUES (?, ?, ?, 1, ?, ?)",
        )
        .bind(id.to_string())
        .bind(new_case.casa_org_id.to_string())
        .bind(&new_case.case_number)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DomainError::Database(DbError::Conflict(format!(
                    "Case number already exists in this organization: {}",
                    new_case.case_number
                )))
            }
            _ => DomainError::Database(DbError::from(e)),
        })?;

        self.find_by_id(id).await
    }

    async fn find_for_volunteer(&self, volunteer_id: Uuid) -> DomainResult<Vec<CasaCase>> {
        let rows = query_as::<_, CasaCaseRow>(
            "SELECT c.* FROM casa_cases c
             JOIN case_assignments a ON a.casa_case_id = c.id
             WHERE a.volunteer_id = ? AND a.active = 1 AND c.deleted_at IS NULL
             ORDER BY c.case_number",
        )
        .bind(volunteer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        rows.into_iter().map(CasaCaseRow::into_entity).collect()
    }

    async fn assign_volunteer(
        &self,
        case_id: Uuid,
        volunteer_id: Uuid,
    ) -> DomainResult<CaseAssignment> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO case_assignments (id, casa_case_id, volunteer_id, active, created_at, updated_at)
             VALUES (?, ?, ?, 1, ?, ?)",
        )
        .bind(id.to_string())
        .bind(case_id.to_string())
        .bind(volunteer_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DomainError::Database(DbError::Conflict(
                    "Volunteer is already assigned to this case".to_string(),
                ))
            }
            _ => DomainError::Database(DbError::from(e)),
        })?;

        let row = query_as::<_, CaseAssignmentRow>("SELECT * FROM case_assignments WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        row.into_entity()
    }

    async fn is_assigned(&self, case_id: Uuid, volunteer_id: Uuid) -> DomainResult<bool> {
        let count = query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM case_assignments
             WHERE casa_case_id = ? AND volunteer_id = ? AND active = 1",
        )
        .bind(case_id.to_string())
        .bind(volunteer_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        Ok(count > 0)
    }
}
