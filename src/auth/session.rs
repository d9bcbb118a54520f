use crate::auth::AuthContext;
use crate::domains::permission::UserRole;
use uuid::Uuid;

/// A resolved user identity: who, what role, which organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
    pub organization_id: Uuid,
}

impl Identity {
    pub fn new(user_id: Uuid, role: UserRole, organization_id: Uuid) -> Self {
        Self {
            user_id,
            role,
            organization_id,
        }
    }
}

/// Dual-identity session state. While impersonating, `active` is the
/// impersonated identity and `original` holds the authenticated one so it
/// can be restored.
#[derive(Debug, Clone)]
pub struct Session {
    active: Identity,
    original: Option<Identity>,
}

impl Session {
    /// Open a session for a freshly authenticated identity.
    pub fn new(identity: Identity) -> Self {
        Self {
            active: identity,
            original: None,
        }
    }

    /// The identity requests act as.
    pub fn current_user(&self) -> &Identity {
        &self.active
    }

    /// The originally authenticated identity, ignoring impersonation.
    pub fn true_user(&self) -> &Identity {
        self.original.as_ref().unwrap_or(&self.active)
    }

    pub fn is_impersonating(&self) -> bool {
        self.original.is_some()
    }

    /// Switch the acting identity to `target`, keeping a recoverable
    /// reference to the original. Switching targets mid-impersonation
    /// keeps the first original.
    pub fn impersonate(&mut self, target: Identity) {
        if self.original.is_none() {
            self.original = Some(self.active);
        }
        self.active = target;
    }

    /// Restore the original identity, if impersonating.
    pub fn stop_impersonating(&mut self) {
        if let Some(original) = self.original.take() {
            self.active = original;
        }
    }

    /// Build the authorization context for the current request.
    pub fn auth_context(&self) -> AuthContext {
        let mut ctx = AuthContext::new(
            self.active.user_id,
            self.active.role,
            self.active.organization_id,
        );
        if let Some(original) = &self.original {
            ctx.impersonator_id = Some(original.user_id);
        }
        ctx
    }
}
