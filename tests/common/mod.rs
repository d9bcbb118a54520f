#![allow(dead_code)]

use casa_core::auth::{AuthContext, AuthService, Identity, Session};
use casa_core::db_migration;
use casa_core::domains::casa_case::repository::{CasaCaseRepository, SqliteCasaCaseRepository};
use casa_core::domains::casa_case::types::{CasaCase, NewCasaCase};
use casa_core::domains::case_contact::repository::{
    CaseContactRepository, SqliteCaseContactRepository,
};
use casa_core::domains::case_contact::types::{CaseContact, NewCaseContact};
use casa_core::domains::organization::repository::{CasaOrgRepository, SqliteCasaOrgRepository};
use casa_core::domains::organization::types::{CasaOrg, NewCasaOrg};
use casa_core::domains::reimbursement::ReimbursementService;
use casa_core::domains::user::repository::{SqliteUserRepository, UserRepository};
use casa_core::domains::user::types::{NewUser, User};
use casa_core::domains::user::UserService;
use casa_core::domains::volunteer::VolunteerService;
use casa_core::notifications::{Mailer, MemoryMailer};
use casa_core::types::UserRole;
use chrono::Utc;
use rust_decimal_macros::dec;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Everything a test needs: a migrated in-memory database and all services
/// wired over it with a recording mailer.
pub struct TestApp {
    pub pool: SqlitePool,
    pub mailer: Arc<MemoryMailer>,
    pub auth_service: Arc<AuthService>,
    pub user_repo: Arc<dyn UserRepository>,
    pub org_repo: Arc<dyn CasaOrgRepository>,
    pub case_repo: Arc<dyn CasaCaseRepository>,
    pub contact_repo: Arc<dyn CaseContactRepository>,
    pub user_service: UserService,
    pub volunteer_service: VolunteerService,
    pub reimbursement_service: ReimbursementService,
}

pub async fn setup() -> TestApp {
    let _ = env_logger::builder().is_test(true).try_init();
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");

    db_migration::initialize_database(&pool)
        .await
        .expect("migrations");

    let mailer = Arc::new(MemoryMailer::new());
    let mailer_dyn: Arc<dyn Mailer> = mailer.clone();

    let auth_service = Arc::new(AuthService::new(pool.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
    let org_repo: Arc<dyn CasaOrgRepository> = Arc::new(SqliteCasaOrgRepository::new(pool.clone()));
    let case_repo: Arc<dyn CasaCaseRepository> =
        Arc::new(SqliteCasaCaseRepository::new(pool.clone()));
    let contact_repo: Arc<dyn CaseContactRepository> =
        Arc::new(SqliteCaseContactRepository::new(pool.clone()));

    let user_service = UserService::new(user_repo.clone(), auth_service.clone(), mailer_dyn.clone());
    let volunteer_service = VolunteerService::new(
        user_repo.clone(),
        case_repo.clone(),
        auth_service.clone(),
        mailer_dyn.clone(),
    );
    let reimbursement_service = ReimbursementService::new(contact_repo.clone());

    TestApp {
        pool,
        mailer,
        auth_service,
        user_repo,
        org_repo,
        case_repo,
        contact_repo,
        user_service,
        volunteer_service,
        reimbursement_service,
    }
}

pub const TEST_PASSWORD: &str = "12345678";

pub async fn create_org(app: &TestApp, name: &str) -> CasaOrg {
    app.org_repo
        .create(NewCasaOrg {
            name: name.to_string(),
        })
        .await
        .expect("create org")
}

pub async fn create_user(app: &TestApp, org: &CasaOrg, role: UserRole, email: &str) -> User {
    create_user_with_active(app, org, role, email, true).await
}

pub async fn create_user_with_active(
    app: &TestApp,
    org: &CasaOrg,
    role: UserRole,
    email: &str,
    active: bool,
) -> User {
    let password_hash = app
        .auth_service
        .hash_password(TEST_PASSWORD)
        .expect("hash password");

    app.user_repo
        .create(NewUser {
            casa_org_id: org.id,
            email: email.to_string(),
            display_name: format!("{} {}", role.as_str(), &email[..email.find('@').unwrap()]),
            password: password_hash,
            role: role.as_str().to_string(),
            active,
            created_by_user_id: None,
        })
        .await
        .expect("create user")
}

pub fn auth_for(user: &User) -> AuthContext {
    AuthContext::new(user.id, user.role, user.casa_org_id)
}

pub fn session_for(user: &User) -> Session {
    Session::new(Identity::new(user.id, user.role, user.casa_org_id))
}

pub async fn create_case(app: &TestApp, org: &CasaOrg, case_number: &str) -> CasaCase {
    app.case_repo
        .create(NewCasaCase {
            casa_org_id: org.id,
            case_number: case_number.to_string(),
        })
        .await
        .expect("create case")
}

pub async fn create_reimbursable_contact(
    app: &TestApp,
    case: &CasaCase,
    creator: &User,
) -> CaseContact {
    app.contact_repo
        .create(NewCaseContact {
            casa_case_id: case.id,
            creator_id: creator.id,
            occurred_at: Utc::now(),
            duration_minutes: 60,
            contact_made: true,
            miles_driven: dec!(10.5),
            want_driving_reimbursement: true,
            notes: None,
        })
        .await
        .expect("create case contact")
}

pub async fn reload_user(app: &TestApp, id: Uuid) -> User {
    app.user_repo.find_by_id(id).await.expect("reload user")
}
