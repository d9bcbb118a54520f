use crate::domains::permission::{decide, Decision, Permission, ResourceRef, UserRole};
use crate::errors::ServiceError;
use uuid::Uuid;

/// Represents the authentication context for the current operation
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The ID of the acting user (the impersonated identity while impersonating)
    pub user_id: Uuid,

    /// The role of the acting user
    pub role: UserRole,

    /// The organization the acting user belongs to
    pub organization_id: Uuid,

    /// The originally authenticated identity, when it differs from `user_id`
    pub impersonator_id: Option<Uuid>,
}

impl AuthContext {
    /// Create a new authentication context
    pub fn new(user_id: Uuid, role: UserRole, organization_id: Uuid) -> Self {
        Self {
            user_id,
            role,
            organization_id,
            impersonator_id: None,
        }
    }

    /// The "true user": the originally authenticated identity, ignoring any
    /// active impersonation.
    pub fn true_user_id(&self) -> Uuid {
        self.impersonator_id.unwrap_or(self.user_id)
    }

    pub fn is_impersonating(&self) -> bool {
        self.impersonator_id.is_some()
    }

    /// Check if the acting role has a specific permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// Check a permission against a concrete resource. Pure decision,
    /// no side effects.
    pub fn can(&self, permission: Permission, resource: &ResourceRef) -> Decision {
        decide(self, permission, resource)
    }

    /// Authorize a role-level permission, returning an error if not allowed
    pub fn authorize(&self, permission: Permission) -> Result<(), ServiceError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "User does not have permission: {:?}",
                permission
            )))
        }
    }

    /// Authorize a permission against a concrete resource
    pub fn authorize_on(
        &self,
        permission: Permission,
        resource: &ResourceRef,
    ) -> Result<(), ServiceError> {
        if self.can(permission, resource).is_permit() {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "User does not have permission on resource: {:?}",
                permission
            )))
        }
    }
}
