use crate::domains::permission::ResourceRef;
use crate::errors::{DomainError, DomainResult};
use crate::types::UserRole;
use crate::validation::{Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Core User entity - volunteers, supervisors and CASA admins share this
/// shape and differ only in role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub casa_org_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub invitation_token: Option<String>,
    pub invitation_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by_user_id: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active && !self.is_deleted()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::CasaAdmin)
    }

    pub fn is_volunteer(&self) -> bool {
        matches!(self.role, UserRole::Volunteer)
    }

    /// Policy reference for decisions about this user record
    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::user(self.id, self.role, self.casa_org_id)
    }
}

/// NewUser DTO - used when creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub casa_org_id: Uuid,
    pub email: String,
    pub display_name: String,
    /// Plain text password; hashed before persistence. Invited accounts
    /// start with a generated placeholder.
    pub password: String,
    pub role: String,
    pub active: bool,
    pub created_by_user_id: Option<Uuid>,
}

impl Validate for NewUser {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("email", Some(self.email.clone()))
            .required()
            .email()
            .validate()?;

        ValidationBuilder::new("display_name", Some(self.display_name.clone()))
            .required()
            .min_length(2)
            .max_length(50)
            .validate()?;

        ValidationBuilder::new("role", Some(self.role.clone()))
            .required()
            .one_of(&["volunteer", "supervisor", "casa_admin"], Some("Invalid role"))
            .validate()?;

        Ok(())
    }
}

/// UpdateUser DTO - used when updating an existing user.
///
/// `active` and `role` may arrive here from a generic form submission, but
/// the services strip them before persisting: activation state only changes
/// through the dedicated activate/deactivate operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

impl Validate for UpdateUser {
    fn validate(&self) -> DomainResult<()> {
        if let Some(email) = &self.email {
            ValidationBuilder::new("email", Some(email.clone()))
                .required()
                .email()
                .validate()?;
        }

        if let Some(display_name) = &self.display_name {
            ValidationBuilder::new("display_name", Some(display_name.clone()))
                .required()
                .min_length(2)
                .max_length(50)
                .validate()?;
        }

        Ok(())
    }
}

impl UpdateUser {
    /// Whether the payload carries any persistable field change
    pub fn is_empty_update(&self) -> bool {
        self.email.is_none() && self.display_name.is_none()
    }

    /// Drop the fields the generic update path must never persist.
    pub fn sanitized(mut self) -> Self {
        self.active = None;
        self.role = None;
        self
    }
}

/// Password change request for the acting user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

impl Validate for ChangePassword {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("password", Some(self.password.clone()))
            .required()
            .min_length(8)
            .validate()?;

        if self.password != self.password_confirmation {
            return Err(DomainError::Validation(
                crate::errors::ValidationError::invalid_value(
                    "password_confirmation",
                    "Password confirmation does not match",
                ),
            ));
        }

        Ok(())
    }
}

/// Result of a password change, including whether the acting session was
/// re-authenticated in place.
#[derive(Debug, Clone)]
pub struct PasswordChangeOutcome {
    /// True iff the session's true user is the account owner, in which case
    /// re-authentication was bypassed. An impersonating actor changing a
    /// password is never silently signed in as the account owner.
    pub session_refreshed: bool,
}

/// UserRow - SQLite row representation for mapping from database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub casa_org_id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub active: i64,
    pub last_login: Option<String>,
    pub invitation_token: Option<String>,
    pub invitation_created_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub created_by_user_id: Option<String>,
    pub deleted_at: Option<String>,
}

impl UserRow {
    /// Convert database row to domain entity
    pub fn into_entity(self) -> DomainResult<User> {
        let parse_uuid = |s: &Option<String>| -> Option<DomainResult<Uuid>> {
            s.as_ref()
                .map(|id| Uuid::parse_str(id).map_err(|_| DomainError::InvalidUuid(id.clone())))
        };

        let parse_datetime = |s: &Option<String>| -> Option<DomainResult<DateTime<Utc>>> {
            s.as_ref().map(|dt| {
                DateTime::parse_from_rfc3339(dt)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", dt)))
            })
        };

        Ok(User {
            id: Uuid::parse_str(&self.id).map_err(|_| DomainError::InvalidUuid(self.id.clone()))?,
            casa_org_id: Uuid::parse_str(&self.casa_org_id)
                .map_err(|_| DomainError::InvalidUuid(self.casa_org_id.clone()))?,
            email: self.email,
            display_name: self.display_name,
            password_hash: self.password_hash,
            role: UserRole::from_str(&self.role)
                .ok_or_else(|| DomainError::Internal(format!("Invalid role: {}", self.role)))?,
            active: self.active != 0,
            last_login: parse_datetime(&self.last_login).transpose()?,
            invitation_token: self.invitation_token,
            invitation_created_at: parse_datetime(&self.invitation_created_at).transpose()?,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    DomainError::Internal(format!("Invalid date format: {}", self.created_at))
                })?,
            updated_at: DateTime::parse_from_rfc3339(&self.updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    DomainError::Internal(format!("Invalid date format: {}", self.updated_at))
                })?,
            created_by_user_id: parse_uuid(&self.created_by_user_id).transpose()?,
            deleted_at: parse_datetime(&self.deleted_at).transpose()?,
        })
    }
}

/// UserResponse DTO - used for API responses (excludes sensitive fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub casa_org_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub active: bool,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            casa_org_id: user.casa_org_id,
            email: user.email,
            display_name: user.display_name,
            role: user.role.as_str().to_string(),
            active: user.active,
            last_login: user.last_login.map(|dt| dt.to_rfc3339()),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
