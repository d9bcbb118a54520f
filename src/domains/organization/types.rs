use crate::errors::{DomainError, DomainResult};
use crate::validation::{Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// CASA organization - owns users and cases. All authorization is scoped
/// to an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasaOrg {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// NewCasaOrg DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCasaOrg {
    pub name: String,
}

impl Validate for NewCasaOrg {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()
    }
}

/// SQLite row representation
#[derive(Debug, Clone, FromRow)]
pub struct CasaOrgRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CasaOrgRow {
    pub fn into_entity(self) -> DomainResult<CasaOrg> {
        let parse_datetime = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", s)))
        };

        Ok(CasaOrg {
            id: Uuid::parse_str(&self.id).map_err(|_| DomainError::InvalidUuid(self.id.clone()))?,
            name: self.name,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}
