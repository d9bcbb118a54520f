use crate::auth::AuthContext;
use crate::domains::permission::{Permission, UserRole};
use uuid::Uuid;

/// Outcome of a policy decision. Absence of an explicit grant is a `Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny,
}

impl Decision {
    pub fn is_permit(&self) -> bool {
        matches!(self, Decision::Permit)
    }
}

/// A persistence-free reference to the resource a decision is being made
/// about. Carries only the identity facts the policy needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceRef {
    pub organization_id: Option<Uuid>,
    pub owner_user_id: Option<Uuid>,
    pub owner_role: Option<UserRole>,
}

impl ResourceRef {
    /// A resource owned by an organization (a case, a roster, a queue).
    pub fn organization(organization_id: Uuid) -> Self {
        Self {
            organization_id: Some(organization_id),
            ..Default::default()
        }
    }

    /// A resource that is a user record.
    pub fn user(user_id: Uuid, role: UserRole, organization_id: Uuid) -> Self {
        Self {
            organization_id: Some(organization_id),
            owner_user_id: Some(user_id),
            owner_role: Some(role),
        }
    }
}

/// Pure policy function: given the actor, the permission being exercised and
/// a reference to the target resource, answer permit or deny. No I/O, no
/// side effects.
///
/// Decisions never cross organization boundaries: an org-scoped permission
/// is denied whenever the resource belongs to a different organization,
/// for every role including admins.
pub fn decide(actor: &AuthContext, permission: Permission, resource: &ResourceRef) -> Decision {
    if !actor.role.has_permission(permission) {
        return Decision::Deny;
    }

    if let Some(org_id) = resource.organization_id {
        if org_id != actor.organization_id {
            return Decision::Deny;
        }
    }

    match permission {
        Permission::EditOwnProfile => {
            // Self-scoped: the resource must be the actor's own record,
            // unless the actor may manage users outright.
            match resource.owner_user_id {
                Some(owner) if owner == actor.user_id => Decision::Permit,
                Some(_) if actor.role.has_permission(Permission::ManageUsers) => Decision::Permit,
                Some(_) => Decision::Deny,
                None => Decision::Permit,
            }
        }
        Permission::ImpersonateVolunteers => {
            // Only a volunteer record can be the target of impersonation.
            match resource.owner_role {
                Some(role) if role.can_be_impersonated() => Decision::Permit,
                Some(_) => Decision::Deny,
                None => Decision::Deny,
            }
        }
        _ => Decision::Permit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: UserRole, org: Uuid) -> AuthContext {
        AuthContext::new(Uuid::new_v4(), role, org)
    }

    #[test]
    fn same_org_supervisor_may_activate_a_volunteer() {
        let org = Uuid::new_v4();
        let supervisor = actor(UserRole::Supervisor, org);
        let volunteer = ResourceRef::user(Uuid::new_v4(), UserRole::Volunteer, org);

        assert_eq!(
            decide(&supervisor, Permission::ActivateVolunteers, &volunteer),
            Decision::Permit
        );
    }

    #[test]
    fn cross_org_supervisor_is_denied() {
        let supervisor = actor(UserRole::Supervisor, Uuid::new_v4());
        let volunteer = ResourceRef::user(Uuid::new_v4(), UserRole::Volunteer, Uuid::new_v4());

        assert_eq!(
            decide(&supervisor, Permission::ActivateVolunteers, &volunteer),
            Decision::Deny
        );
    }

    #[test]
    fn cross_org_admin_is_denied_too() {
        let admin = actor(UserRole::CasaAdmin, Uuid::new_v4());
        let other_org = ResourceRef::organization(Uuid::new_v4());

        assert_eq!(
            decide(&admin, Permission::ViewReimbursements, &other_org),
            Decision::Deny
        );
    }

    #[test]
    fn volunteer_is_denied_lifecycle_actions_on_another_volunteer() {
        let org = Uuid::new_v4();
        let volunteer = actor(UserRole::Volunteer, org);
        let other = ResourceRef::user(Uuid::new_v4(), UserRole::Volunteer, org);

        for permission in [
            Permission::ActivateVolunteers,
            Permission::DeactivateVolunteers,
            Permission::ImpersonateVolunteers,
        ] {
            assert_eq!(decide(&volunteer, permission, &other), Decision::Deny);
        }
    }

    #[test]
    fn supervisors_cannot_be_impersonated() {
        let org = Uuid::new_v4();
        let admin = actor(UserRole::CasaAdmin, org);
        let supervisor = ResourceRef::user(Uuid::new_v4(), UserRole::Supervisor, org);

        assert_eq!(
            decide(&admin, Permission::ImpersonateVolunteers, &supervisor),
            Decision::Deny
        );
    }

    #[test]
    fn editing_someone_elses_profile_requires_manage_users() {
        let org = Uuid::new_v4();
        let volunteer = actor(UserRole::Volunteer, org);
        let admin = actor(UserRole::CasaAdmin, org);
        let target = ResourceRef::user(Uuid::new_v4(), UserRole::Volunteer, org);

        assert_eq!(
            decide(&volunteer, Permission::EditOwnProfile, &target),
            Decision::Deny
        );
        assert_eq!(
            decide(&admin, Permission::EditOwnProfile, &target),
            Decision::Permit
        );
    }
}
