use crate::errors::{DomainError, DomainResult};
use crate::validation::{Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A youth case tracked by an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasaCase {
    pub id: Uuid,
    pub casa_org_id: Uuid,
    pub case_number: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CasaCase {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// NewCasaCase DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCasaCase {
    pub casa_org_id: Uuid,
    pub case_number: String,
}

impl Validate for NewCasaCase {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("case_number", Some(self.case_number.clone()))
            .required()
            .max_length(32)
            .validate()
    }
}

/// Join entity linking a volunteer to a case. Not independently mutable
/// by non-admin roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAssignment {
    pub id: Uuid,
    pub casa_case_id: Uuid,
    pub volunteer_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SQLite row representation for cases
#[derive(Debug, Clone, FromRow)]
pub struct CasaCaseRow {
    pub id: String,
    pub casa_org_id: String,
    pub case_number: String,
    pub active: i64,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl CasaCaseRow {
    pub fn into_entity(self) -> DomainResult<CasaCase> {
        let parse_datetime = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", s)))
        };

        Ok(CasaCase {
            id: Uuid::parse_str(&self.id).map_err(|_| DomainError::InvalidUuid(self.id.clone()))?,
            casa_org_id: Uuid::parse_str(&self.casa_org_id)
                .map_err(|_| DomainError::InvalidUuid(self.casa_org_id.clone()))?,
            case_number: self.case_number,
            active: self.active != 0,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            deleted_at: self.deleted_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

/// SQLite row representation for assignments
#[derive(Debug, Clone, FromRow)]
pub struct CaseAssignmentRow {
    pub id: String,
    pub casa_case_id: String,
    pub volunteer_id: String,
    pub active: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CaseAssignmentRow {
    pub fn into_entity(self) -> DomainResult<CaseAssignment> {
        let parse_datetime = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", s)))
        };

        Ok(CaseAssignment {
            id: Uuid::parse_str(&self.id).map_err(|_| DomainError::InvalidUuid(self.id.clone()))?,
            casa_case_id: Uuid::parse_str(&self.casa_case_id)
                .map_err(|_| DomainError::InvalidUuid(self.casa_case_id.clone()))?,
            volunteer_id: Uuid::parse_str(&self.volunteer_id)
                .map_err(|_| DomainError::InvalidUuid(self.volunteer_id.clone()))?,
            active: self.active != 0,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}
