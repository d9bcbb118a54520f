use crate::auth::{AuthContext, AuthService, Identity, Session};
use crate::domains::casa_case::repository::CasaCaseRepository;
use crate::domains::permission::Permission;
use crate::domains::user::repository::UserRepository;
use crate::domains::user::types::{NewUser, UpdateUser, User};
use crate::domains::volunteer::types::{
    ActionOutcome, ActivationRedirect, NewVolunteer, RedirectTarget,
};
use crate::errors::{DomainError, ServiceError, ServiceResult};
use crate::notifications::{dispatch_best_effort, Mailer, OutboundEmail};
use crate::validation::Validate;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

/// The volunteer lifecycle controller: activation, deactivation, roster
/// edits, invitations and impersonation.
///
/// Permission checks run first and are pure; only a permit reaches the
/// state change. Denial is returned as `ActionOutcome::denied()`, never as
/// an error. Notification dispatch is best-effort and happens after the
/// state change has committed.
pub struct VolunteerService {
    user_repo: Arc<dyn UserRepository>,
    case_repo: Arc<dyn CasaCaseRepository>,
    auth_service: Arc<AuthService>,
    mailer: Arc<dyn Mailer>,
}

impl VolunteerService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        case_repo: Arc<dyn CasaCaseRepository>,
        auth_service: Arc<AuthService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            user_repo,
            case_repo,
            auth_service,
            mailer,
        }
    }

    /// Load a user and require it to be a volunteer record
    async fn find_volunteer(&self, id: Uuid) -> ServiceResult<User> {
        let user = self.user_repo.find_by_id(id).await.map_err(ServiceError::Domain)?;
        if !user.is_volunteer() {
            return Err(ServiceError::Domain(DomainError::EntityNotFound(
                "Volunteer".to_string(),
                id,
            )));
        }
        Ok(user)
    }

    /// Create an invited volunteer account and send the setup email.
    ///
    /// Validation failure persists nothing. The account starts active with
    /// a placeholder password hash; the volunteer sets a real password
    /// through the invitation link.
    pub async fn create_volunteer(
        &self,
        new_volunteer: NewVolunteer,
        auth: &AuthContext,
    ) -> ServiceResult<ActionOutcome> {
        if !auth
            .can(
                Permission::CreateVolunteers,
                &crate::domains::permission::ResourceRef::organization(new_volunteer.casa_org_id),
            )
            .is_permit()
        {
            return Ok(ActionOutcome::denied());
        }

        new_volunteer.validate().map_err(ServiceError::Domain)?;

        if !self
            .user_repo
            .is_email_unique(&new_volunteer.email, None)
            .await
            .map_err(ServiceError::Domain)?
        {
            return Err(ServiceError::Domain(DomainError::Validation(
                crate::errors::ValidationError::unique("email"),
            )));
        }

        let placeholder = self.auth_service.hash_password(&generate_token())?;

        let user = self
            .user_repo
            .create(NewUser {
                casa_org_id: new_volunteer.casa_org_id,
                email: new_volunteer.email,
                display_name: new_volunteer.display_name,
                password: placeholder,
                role: "volunteer".to_string(),
                active: true,
                created_by_user_id: Some(auth.user_id),
            })
            .await
            .map_err(ServiceError::Domain)?;

        let user = self
            .user_repo
            .set_invitation_token(user.id, &generate_token())
            .await
            .map_err(ServiceError::Domain)?;

        dispatch_best_effort(self.mailer.as_ref(), OutboundEmail::account_setup(&user)).await;

        log::info!("Volunteer {} created by user {}", user.id, auth.user_id);

        Ok(ActionOutcome::success(
            RedirectTarget::VolunteerEdit(user.id),
            "Volunteer was successfully created.",
        ))
    }

    /// Activate a volunteer and notify them by email.
    ///
    /// Idempotent: activating an already-active volunteer succeeds and
    /// still notifies. When `redirect` names a case the volunteer is
    /// assigned to, the caller is sent to that case's edit view.
    pub async fn activate(
        &self,
        volunteer_id: Uuid,
        redirect: ActivationRedirect,
        auth: &AuthContext,
    ) -> ServiceResult<ActionOutcome> {
        let volunteer = self.find_volunteer(volunteer_id).await?;

        if !auth
            .can(Permission::ActivateVolunteers, &volunteer.resource_ref())
            .is_permit()
        {
            return Ok(ActionOutcome::denied());
        }

        let volunteer = self
            .user_repo
            .set_active(volunteer.id, true)
            .await
            .map_err(ServiceError::Domain)?;

        // State change is committed; the email is best-effort from here on
        dispatch_best_effort(self.mailer.as_ref(), OutboundEmail::account_activated(&volunteer))
            .await;

        let target = match redirect.casa_case_id {
            Some(case_id)
                if self
                    .case_repo
                    .is_assigned(case_id, volunteer.id)
                    .await
                    .map_err(ServiceError::Domain)? =>
            {
                RedirectTarget::CasaCaseEdit(case_id)
            }
            _ => RedirectTarget::VolunteerEdit(volunteer.id),
        };

        log::info!("Volunteer {} activated by user {}", volunteer.id, auth.user_id);

        Ok(ActionOutcome::success(
            target,
            "Volunteer was activated. They have been sent an email.",
        ))
    }

    /// Deactivate a volunteer. Deactivation is silent: unlike activation,
    /// no email is sent.
    pub async fn deactivate(
        &self,
        volunteer_id: Uuid,
        auth: &AuthContext,
    ) -> ServiceResult<ActionOutcome> {
        let volunteer = self.find_volunteer(volunteer_id).await?;

        if !auth
            .can(Permission::DeactivateVolunteers, &volunteer.resource_ref())
            .is_permit()
        {
            return Ok(ActionOutcome::denied());
        }

        let volunteer = self
            .user_repo
            .set_active(volunteer.id, false)
            .await
            .map_err(ServiceError::Domain)?;

        log::info!("Volunteer {} deactivated by user {}", volunteer.id, auth.user_id);

        Ok(ActionOutcome::success(
            RedirectTarget::VolunteerEdit(volunteer.id),
            "Volunteer was deactivated.",
        ))
    }

    /// Edit a volunteer's roster record. Activation state never changes
    /// through this path: any `active` (or `role`) value in the payload is
    /// stripped before the update is persisted.
    pub async fn update_volunteer(
        &self,
        volunteer_id: Uuid,
        update: UpdateUser,
        auth: &AuthContext,
    ) -> ServiceResult<User> {
        let volunteer = self.find_volunteer(volunteer_id).await?;
        auth.authorize_on(Permission::EditVolunteers, &volunteer.resource_ref())?;

        let update = update.sanitized();
        update.validate().map_err(ServiceError::Domain)?;

        if update.is_empty_update() {
            return Ok(volunteer);
        }

        if let Some(email) = &update.email {
            if !self
                .user_repo
                .is_email_unique(email, Some(volunteer.id))
                .await
                .map_err(ServiceError::Domain)?
            {
                return Err(ServiceError::Domain(DomainError::Validation(
                    crate::errors::ValidationError::unique("email"),
                )));
            }
        }

        let updated = self
            .user_repo
            .update(volunteer.id, update)
            .await
            .map_err(ServiceError::Domain)?;

        Ok(updated)
    }

    /// Regenerate the invitation token and resend the invitation email
    pub async fn resend_invitation(
        &self,
        volunteer_id: Uuid,
        auth: &AuthContext,
    ) -> ServiceResult<ActionOutcome> {
        let volunteer = self.find_volunteer(volunteer_id).await?;

        if !auth
            .can(Permission::EditVolunteers, &volunteer.resource_ref())
            .is_permit()
        {
            return Ok(ActionOutcome::denied());
        }

        let volunteer = self
            .user_repo
            .set_invitation_token(volunteer.id, &generate_token())
            .await
            .map_err(ServiceError::Domain)?;

        dispatch_best_effort(self.mailer.as_ref(), OutboundEmail::invitation(&volunteer)).await;

        Ok(ActionOutcome::success(
            RedirectTarget::VolunteerEdit(volunteer.id),
            "Invitation sent.",
        ))
    }

    /// Switch the session's acting identity to the volunteer.
    ///
    /// On denial the session is left untouched and the caller is redirected
    /// to the safe default location with the standard notice.
    pub async fn impersonate(
        &self,
        volunteer_id: Uuid,
        session: &mut Session,
        auth: &AuthContext,
    ) -> ServiceResult<ActionOutcome> {
        let target = self.user_repo.find_by_id(volunteer_id).await.map_err(ServiceError::Domain)?;

        if !auth
            .can(Permission::ImpersonateVolunteers, &target.resource_ref())
            .is_permit()
        {
            return Ok(ActionOutcome::denied());
        }

        session.impersonate(Identity::new(target.id, target.role, target.casa_org_id));

        log::info!(
            "User {} is now impersonating volunteer {}",
            session.true_user().user_id,
            target.id
        );

        Ok(ActionOutcome::success(RedirectTarget::Home, ""))
    }
}

/// Opaque invitation token: random material digested to a hex string
fn generate_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(rand::random::<[u8; 16]>());
    hex::encode(hasher.finalize())
}
