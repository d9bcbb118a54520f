use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// A logged interaction with a case. Reimbursement eligibility hangs off
/// the mileage fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseContact {
    pub id: Uuid,
    pub casa_case_id: Uuid,
    pub creator_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub contact_made: bool,
    pub miles_driven: Decimal,
    pub want_driving_reimbursement: bool,
    pub reimbursement_complete: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// NewCaseContact DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCaseContact {
    pub casa_case_id: Uuid,
    pub creator_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub contact_made: bool,
    pub miles_driven: Decimal,
    pub want_driving_reimbursement: bool,
    pub notes: Option<String>,
}

/// SQLite row representation
#[derive(Debug, Clone, FromRow)]
pub struct CaseContactRow {
    pub id: String,
    pub casa_case_id: String,
    pub creator_id: String,
    pub occurred_at: String,
    pub duration_minutes: i64,
    pub contact_made: i64,
    pub miles_driven: String,
    pub want_driving_reimbursement: i64,
    pub reimbursement_complete: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl CaseContactRow {
    pub fn into_entity(self) -> DomainResult<CaseContact> {
        let parse_datetime = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", s)))
        };

        Ok(CaseContact {
            id: Uuid::parse_str(&self.id).map_err(|_| DomainError::InvalidUuid(self.id.clone()))?,
            casa_case_id: Uuid::parse_str(&self.casa_case_id)
                .map_err(|_| DomainError::InvalidUuid(self.casa_case_id.clone()))?,
            creator_id: Uuid::parse_str(&self.creator_id)
                .map_err(|_| DomainError::InvalidUuid(self.creator_id.clone()))?,
            occurred_at: parse_datetime(&self.occurred_at)?,
            duration_minutes: self.duration_minutes,
            contact_made: self.contact_made != 0,
            miles_driven: Decimal::from_str(&self.miles_driven).map_err(|_| {
                DomainError::Internal(format!("Invalid mileage value: {}", self.miles_driven))
            })?,
            want_driving_reimbursement: self.want_driving_reimbursement != 0,
            reimbursement_complete: self.reimbursement_complete != 0,
            notes: self.notes,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            deleted_at: self.deleted_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}
