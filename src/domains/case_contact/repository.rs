use crate::domains::case_contact::types::{CaseContact, CaseContactRow, NewCaseContact};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::types::PaginationParams;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, SqlitePool};
use uuid::Uuid;

/// Case contact repository trait
#[async_trait]
pub trait CaseContactRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<CaseContact>;

    async fn create(&self, new_contact: NewCaseContact) -> DomainResult<CaseContact>;

    /// Contacts requesting driving reimbursement whose owning case belongs
    /// to `casa_org_id`. The org filter is part of the join, never applied
    /// per row after the fact.
    async fn find_reimbursable_in_org(
        &self,
        casa_org_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<(Vec<CaseContact>, u64)>;

    /// Set the reimbursement completion flag. The org guard is part of the
    /// statement so a cross-org ID behaves exactly like a missing one.
    async fn set_reimbursement_complete(
        &self,
        id: Uuid,
        casa_org_id: Uuid,
        complete: bool,
    ) -> DomainResult<CaseContact>;
}

/// SQLite implementation of CaseContactRepository
pub struct SqliteCaseContactRepository {
    pool: SqlitePool,
}

impl SqliteCaseContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseContactRepository for SqliteCaseContactRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<CaseContact> {
        let row = query_as::<_, CaseContactRow>(
            "SELECT * FROM case_contacts WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?
        .ok_or_else(|| DomainError::EntityNotFound("CaseContact".to_string(), id))?;

        row.into_entity()
    }

    async fn create(&self, new_contact: NewCaseContact) -> DomainResult<CaseContact> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO case_contacts
                (id, casa_case_id, creator_id, occurred_at, duration_minutes, contact_made,
                 miles_driven, want_driving_reimbursement, reimbursement_complete, notes,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(new_contact.casa_case_id.to_string())
        .bind(new_contact.creator_id.to_string())
        .bind(new_contact.occurred_at.to_rfc3339())
        .bind(new_contact.duration_minutes)
        .bind(new_contact.contact_made as i64)
        .bind(new_contact.miles_driven.to_string())
        .bind(new_contact.want_driving_reimbursement as i64)
        .bind(&new_contact.notes)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn find_reimbursable_in_org(
        &self,
        casa_org_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<(Vec<CaseContact>, u64)> {
        let total = query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM case_contacts cc
             JOIN casa_cases c ON cc.casa_case_id = c.id
             WHERE c.casa_org_id = ?
               AND cc.want_driving_reimbursement = 1
               AND cc.deleted_at IS NULL",
        )
        .bind(casa_org_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        let rows = query_as::<_, CaseContactRow>(
            "SELECT cc.* FROM case_contacts cc
             JOIN casa_cases c ON cc.casa_case_id = c.id
             WHERE c.casa_org_id = ?
               AND cc.want_driving_reimbursement = 1
               AND cc.deleted_at IS NULL
             ORDER BY cc.occurred_at DESC
             LIMIT ? OFFSET ?",
        )
        .bind(casa_org_id.to_string())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        let contacts = rows
            .into_iter()
            .map(CaseContactRow::into_entity)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok((contacts, total as u64))
    }

    async fn set_reimbursement_complete(
        &self,
        id: Uuid,
        casa_org_id: Uuid,
        complete: bool,
    ) -> DomainResult<CaseContact> {
        let now = Utc::now().to_rfc3339();

        let result = query(
            "UPDATE case_contacts SET reimbursement_complete = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL
               AND casa_case_id IN (SELECT id FROM casa_cases WHERE casa_org_id = ?)",
        )
        .bind(complete as i64)
        .bind(&now)
        .bind(id.to_string())
        .bind(casa_org_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("CaseContact".to_string(), id));
        }

        self.find_by_id(id).await
    }
}
