use crate::auth::session::{Identity, Session};
use crate::auth::{AuthContext, AuthRepository};
use crate::domains::user::types::User;
use crate::errors::{DomainError, ServiceError, ServiceResult};
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Result of a successful login
#[derive(Debug)]
pub struct LoginResult {
    pub user: User,
    pub session: Session,
    pub auth_context: AuthContext,
}

/// Auth service for credential verification and session establishment
pub struct AuthService {
    auth_repo: Arc<dyn AuthRepository>,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        let auth_repo = Arc::new(super::repository::SqliteAuthRepository::new(pool));
        Self { auth_repo }
    }

    /// Authenticate a user with email and password, opening a session.
    /// Every attempt is recorded; failures use a non-revealing message.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginResult> {
        let user = match self.auth_repo.find_user_by_email(email).await {
            Ok(user) => user,
            Err(_) => {
                self.auth_repo
                    .log_login_attempt(email, false, None)
                    .await
                    .map_err(DomainError::Database)?;
                return Err(ServiceError::Authentication(
                    "Invalid email or password".to_string(),
                ));
            }
        };

        if !user.is_active() {
            self.auth_repo
                .log_login_attempt(email, false, Some(user.id))
                .await
                .map_err(DomainError::Database)?;
            return Err(ServiceError::Authentication("Account is inactive".to_string()));
        }

        if !self.valid_password(&user, password) {
            self.auth_repo
                .log_login_attempt(email, false, Some(user.id))
                .await
                .map_err(DomainError::Database)?;
            return Err(ServiceError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        self.auth_repo
            .update_last_login(user.id)
            .await
            .map_err(DomainError::Database)?;
        self.auth_repo
            .log_login_attempt(email, true, Some(user.id))
            .await
            .map_err(DomainError::Database)?;

        let session = Session::new(Identity::new(user.id, user.role, user.casa_org_id));
        let auth_context = session.auth_context();

        Ok(LoginResult {
            user,
            session,
            auth_context,
        })
    }

    /// Generate an argon2 hash for a new password
    pub fn hash_password(&self, password: &str) -> ServiceResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                ServiceError::Domain(DomainError::Internal(format!(
                    "Failed to hash password: {}",
                    e
                )))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a candidate password against a user's stored hash
    pub fn valid_password(&self, user: &User, candidate: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&user.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
