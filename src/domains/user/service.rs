use crate::auth::{AuthContext, AuthService, Session};
use crate::domains::permission::Permission;
use crate::domains::user::repository::UserRepository;
use crate::domains::user::types::{
    ChangePassword, PasswordChangeOutcome, UpdateUser, User, UserResponse,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::notifications::{dispatch_best_effort, Mailer, OutboundEmail};
use crate::validation::Validate;
use std::sync::Arc;
use uuid::Uuid;

/// Service for user-related operations
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    auth_service: Arc<AuthService>,
    mailer: Arc<dyn Mailer>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        auth_service: Arc<AuthService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            user_repo,
            auth_service,
            mailer,
        }
    }

    /// Get a user by ID. Admin console path; org boundary enforced.
    pub async fn get_user(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<User> {
        auth.authorize(Permission::ManageUsers)?;

        let user = self.user_repo.find_by_id(id).await.map_err(ServiceError::Domain)?;
        auth.authorize_on(Permission::ManageUsers, &user.resource_ref())?;

        Ok(user)
    }

    pub async fn get_user_response(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<UserResponse> {
        let user = self.get_user(id, auth).await?;
        Ok(user.into())
    }

    /// All users in the actor's organization
    pub async fn get_all_users(&self, auth: &AuthContext) -> ServiceResult<Vec<User>> {
        auth.authorize(Permission::ManageUsers)?;

        let users = self
            .user_repo
            .find_all_in_org(auth.organization_id)
            .await
            .map_err(ServiceError::Domain)?;

        Ok(users)
    }

    /// Get the acting user's profile
    pub async fn get_current_user(&self, auth: &AuthContext) -> ServiceResult<User> {
        let user = self
            .user_repo
            .find_by_id(auth.user_id)
            .await
            .map_err(ServiceError::Domain)?;

        Ok(user)
    }

    /// Update the acting user's own profile. Any `active` or `role` value
    /// in the payload is stripped before persisting; the generic update
    /// path can never change activation state.
    pub async fn update_profile(
        &self,
        update: UpdateUser,
        auth: &AuthContext,
    ) -> ServiceResult<User> {
        let update = update.sanitized();
        update.validate().map_err(ServiceError::Domain)?;

        if update.is_empty_update() {
            return self.get_current_user(auth).await;
        }

        let updated = self
            .user_repo
            .update(auth.user_id, update)
            .await
            .map_err(ServiceError::Domain)?;

        Ok(updated)
    }

    /// Change the acting user's password.
    ///
    /// Requires the current password. On success the account owner gets a
    /// reminder email, and re-authentication is bypassed only when the
    /// session's true user is the account owner: an actor impersonating
    /// someone else while changing a password is not silently signed in
    /// as that someone else.
    pub async fn change_password(
        &self,
        request: ChangePassword,
        session: &Session,
        auth: &AuthContext,
    ) -> ServiceResult<PasswordChangeOutcome> {
        let user = self
            .user_repo
            .find_by_id(auth.user_id)
            .await
            .map_err(ServiceError::Domain)?;

        if !self.auth_service.valid_password(&user, &request.current_password) {
            return Err(ServiceError::Authentication(
                "Current password is incorrect".to_string(),
            ));
        }

        request.validate().map_err(ServiceError::Domain)?;

        let password_hash = self.auth_service.hash_password(&request.password)?;
        self.user_repo
            .update_password_hash(user.id, &password_hash)
            .await
            .map_err(ServiceError::Domain)?;

        dispatch_best_effort(self.mailer.as_ref(), OutboundEmail::password_changed_reminder(&user))
            .await;

        let session_refreshed = session.true_user().user_id == user.id;
        if session_refreshed {
            log::info!("Password changed for user {}; session re-authenticated in place", user.id);
        } else {
            log::info!(
                "Password changed for user {} by impersonating actor {}; session left untouched",
                user.id,
                session.true_user().user_id
            );
        }

        Ok(PasswordChangeOutcome { session_refreshed })
    }
}
