use serde::{Deserialize, Serialize};

// --- User Role Definition ---

/// UserRole enum for authorization in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Volunteer,
    Supervisor,
    CasaAdmin,
}

// --- Permission Enum Definition ---

/// Permission enum representing individual permissions in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // User management (admin console)
    ManageUsers,

    // Own profile
    EditOwnProfile,

    // Volunteer roster
    ViewVolunteers,
    CreateVolunteers,
    EditVolunteers,
    ActivateVolunteers,
    DeactivateVolunteers,
    ImpersonateVolunteers,

    // Cases
    ViewCases,
    EditCases,

    // Reimbursements
    ViewReimbursements,
    ManageReimbursements,
}

// --- UserRole Implementation ---

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Volunteer => "volunteer",
            UserRole::Supervisor => "supervisor",
            UserRole::CasaAdmin => "casa_admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "volunteer" => Some(UserRole::Volunteer),
            "supervisor" => Some(UserRole::Supervisor),
            "casa_admin" => Some(UserRole::CasaAdmin),
            _ => None,
        }
    }

    /// Check if the role carries a specific permission. Anything not
    /// explicitly granted here is denied.
    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            UserRole::CasaAdmin => true, // Admin has all permissions within their org
            UserRole::Supervisor => {
                match permission {
                    // Admin-only permissions - deny supervisors
                    Permission::ManageUsers
                    | Permission::ViewReimbursements
                    | Permission::ManageReimbursements => false,

                    // Volunteer roster management within the supervisor's org
                    Permission::ViewVolunteers
                    | Permission::CreateVolunteers
                    | Permission::EditVolunteers
                    | Permission::ActivateVolunteers
                    | Permission::DeactivateVolunteers
                    | Permission::ImpersonateVolunteers => true,

                    Permission::EditOwnProfile
                    | Permission::ViewCases
                    | Permission::EditCases => true,
                }
            }
            UserRole::Volunteer => {
                match permission {
                    Permission::EditOwnProfile | Permission::ViewCases => true,

                    // Volunteers can never manage other volunteers or money
                    Permission::ManageUsers
                    | Permission::ViewVolunteers
                    | Permission::CreateVolunteers
                    | Permission::EditVolunteers
                    | Permission::ActivateVolunteers
                    | Permission::DeactivateVolunteers
                    | Permission::ImpersonateVolunteers
                    | Permission::EditCases
                    | Permission::ViewReimbursements
                    | Permission::ManageReimbursements => false,
                }
            }
        }
    }

    /// Only volunteers can be impersonated.
    pub fn can_be_impersonated(&self) -> bool {
        matches!(self, UserRole::Volunteer)
    }
}

// --- Permission Implementation (String Conversions & Listing) ---

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::EditOwnProfile => "edit_own_profile",
            Permission::ViewVolunteers => "view_volunteers",
            Permission::CreateVolunteers => "create_volunteers",
            Permission::EditVolunteers => "edit_volunteers",
            Permission::ActivateVolunteers => "activate_volunteers",
            Permission::DeactivateVolunteers => "deactivate_volunteers",
            Permission::ImpersonateVolunteers => "impersonate_volunteers",
            Permission::ViewCases => "view_cases",
            Permission::EditCases => "edit_cases",
            Permission::ViewReimbursements => "view_reimbursements",
            Permission::ManageReimbursements => "manage_reimbursements",
        }
    }

    /// All permissions, for admin tooling and diagnostics.
    pub fn all() -> Vec<Permission> {
        vec![
            Permission::ManageUsers,
            Permission::EditOwnProfile,
            Permission::ViewVolunteers,
            Permission::CreateVolunteers,
            Permission::EditVolunteers,
            Permission::ActivateVolunteers,
            Permission::DeactivateVolunteers,
            Permission::ImpersonateVolunteers,
            Permission::ViewCases,
            Permission::EditCases,
            Permission::ViewReimbursements,
            Permission::ManageReimbursements,
        ]
    }
}
