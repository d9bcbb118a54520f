mod common;

use casa_core::domains::user::types::UpdateUser;
use casa_core::domains::volunteer::{ActivationRedirect, NewVolunteer, RedirectTarget};
use casa_core::errors::{DomainError, ServiceError};
use casa_core::notifications::EmailKind;
use casa_core::types::UserRole;

use common::*;

#[tokio::test]
async fn activating_an_inactive_volunteer_notifies_and_redirects_to_their_edit_view() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer =
        create_user_with_active(&app, &org, UserRole::Volunteer, "vol@example.com", false).await;

    let outcome = app
        .volunteer_service
        .activate(volunteer.id, ActivationRedirect::default(), &auth_for(&admin))
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert_eq!(outcome.redirect, RedirectTarget::VolunteerEdit(volunteer.id));
    assert_eq!(
        outcome.notice,
        "Volunteer was activated. They have been sent an email."
    );

    let reloaded = reload_user(&app, volunteer.id).await;
    assert!(reloaded.active);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, EmailKind::AccountActivated);
    assert_eq!(sent[0].to, "vol@example.com");
}

#[tokio::test]
async fn activating_with_an_assigned_case_redirects_to_that_case() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer =
        create_user_with_active(&app, &org, UserRole::Volunteer, "vol@example.com", false).await;
    let case = create_case(&app, &org, "CINA-1").await;
    app.case_repo.assign_volunteer(case.id, volunteer.id).await.unwrap();

    let outcome = app
        .volunteer_service
        .activate(volunteer.id, ActivationRedirect::to_case(case.id), &auth_for(&admin))
        .await
        .unwrap();

    assert_eq!(outcome.redirect, RedirectTarget::CasaCaseEdit(case.id));
    assert_eq!(
        outcome.notice,
        "Volunteer was activated. They have been sent an email."
    );
}

#[tokio::test]
async fn activating_with_an_unassigned_case_falls_back_to_the_volunteer_edit_view() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer =
        create_user_with_active(&app, &org, UserRole::Volunteer, "vol@example.com", false).await;
    let case = create_case(&app, &org, "CINA-1").await;

    let outcome = app
        .volunteer_service
        .activate(volunteer.id, ActivationRedirect::to_case(case.id), &auth_for(&admin))
        .await
        .unwrap();

    assert_eq!(outcome.redirect, RedirectTarget::VolunteerEdit(volunteer.id));
}

#[tokio::test]
async fn activation_is_idempotent() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;

    let outcome = app
        .volunteer_service
        .activate(volunteer.id, ActivationRedirect::default(), &auth_for(&admin))
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert!(reload_user(&app, volunteer.id).await.active);
}

#[tokio::test]
async fn deactivation_is_silent() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;

    let outcome = app
        .volunteer_service
        .deactivate(volunteer.id, &auth_for(&admin))
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert!(!reload_user(&app, volunteer.id).await.active);
    assert_eq!(app.mailer.sent_count(), 0);
}

#[tokio::test]
async fn a_same_org_supervisor_can_activate() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let supervisor = create_user(&app, &org, UserRole::Supervisor, "sup@example.com").await;
    let volunteer =
        create_user_with_active(&app, &org, UserRole::Volunteer, "vol@example.com", false).await;

    let outcome = app
        .volunteer_service
        .activate(volunteer.id, ActivationRedirect::default(), &auth_for(&supervisor))
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert!(reload_user(&app, volunteer.id).await.active);
}

#[tokio::test]
async fn a_cross_org_supervisor_is_denied() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let other_org = create_org(&app, "Montgomery CASA").await;
    let supervisor = create_user(&app, &other_org, UserRole::Supervisor, "sup@example.com").await;
    let volunteer =
        create_user_with_active(&app, &org, UserRole::Volunteer, "vol@example.com", false).await;

    let outcome = app
        .volunteer_service
        .activate(volunteer.id, ActivationRedirect::default(), &auth_for(&supervisor))
        .await
        .unwrap();

    assert!(!outcome.authorized);
    assert_eq!(outcome.redirect, RedirectTarget::Home);
    assert!(!reload_user(&app, volunteer.id).await.active);
    assert_eq!(app.mailer.sent_count(), 0);
}

#[tokio::test]
async fn a_volunteer_cannot_deactivate_another_volunteer() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let actor = create_user(&app, &org, UserRole::Volunteer, "actor@example.com").await;
    let target = create_user(&app, &org, UserRole::Volunteer, "target@example.com").await;

    let outcome = app
        .volunteer_service
        .deactivate(target.id, &auth_for(&actor))
        .await
        .unwrap();

    assert!(!outcome.authorized);
    assert!(reload_user(&app, target.id).await.active);
}

#[tokio::test]
async fn updating_a_volunteer_cannot_change_the_active_state() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;

    let update = UpdateUser {
        display_name: Some("New Name".to_string()),
        active: Some(false),
        ..Default::default()
    };

    let updated = app
        .volunteer_service
        .update_volunteer(volunteer.id, update, &auth_for(&admin))
        .await
        .unwrap();

    assert_eq!(updated.display_name, "New Name");
    assert!(updated.active);
    assert!(reload_user(&app, volunteer.id).await.active);
}

#[tokio::test]
async fn updating_to_a_taken_email_fails_without_persisting() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;
    let other = create_user(&app, &org, UserRole::Volunteer, "other@example.com").await;

    let update = UpdateUser {
        email: Some(other.email.clone()),
        display_name: Some("New Name".to_string()),
        ..Default::default()
    };

    let result = app
        .volunteer_service
        .update_volunteer(volunteer.id, update, &auth_for(&admin))
        .await;

    match result {
        Err(ServiceError::Domain(DomainError::Validation(err))) => {
            assert_eq!(err.field(), "email");
        }
        other => panic!("expected a validation error, got {:?}", other),
    }

    let reloaded = reload_user(&app, volunteer.id).await;
    assert_eq!(reloaded.email, "vol@example.com");
    assert_ne!(reloaded.display_name, "New Name");
}

#[tokio::test]
async fn creating_a_volunteer_sends_an_account_setup_email() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;

    let outcome = app
        .volunteer_service
        .create_volunteer(
            NewVolunteer {
                email: "volunteer1@example.com".to_string(),
                display_name: "Example".to_string(),
                casa_org_id: org.id,
            },
            &auth_for(&admin),
        )
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert_eq!(outcome.notice, "Volunteer was successfully created.");

    let created = app
        .user_repo
        .find_by_email("volunteer1@example.com")
        .await
        .unwrap();
    assert_eq!(created.display_name, "Example");
    assert!(created.is_volunteer());
    assert!(created.invitation_token.is_some());
    assert_eq!(outcome.redirect, RedirectTarget::VolunteerEdit(created.id));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, EmailKind::AccountSetup);
}

#[tokio::test]
async fn creating_a_volunteer_with_invalid_params_persists_nothing() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;

    let result = app
        .volunteer_service
        .create_volunteer(
            NewVolunteer {
                email: "volunteer1@example.com".to_string(),
                display_name: "".to_string(),
                casa_org_id: org.id,
            },
            &auth_for(&admin),
        )
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::Validation(_)))
    ));
    assert!(app.user_repo.find_by_email("volunteer1@example.com").await.is_err());
    assert_eq!(app.mailer.sent_count(), 0);
}

#[tokio::test]
async fn resending_an_invitation_stamps_the_token_and_sends_mail() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;
    assert!(volunteer.invitation_created_at.is_none());

    let outcome = app
        .volunteer_service
        .resend_invitation(volunteer.id, &auth_for(&admin))
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert_eq!(outcome.redirect, RedirectTarget::VolunteerEdit(volunteer.id));

    let reloaded = reload_user(&app, volunteer.id).await;
    assert!(reloaded.invitation_created_at.is_some());
    assert!(reloaded.invitation_token.is_some());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, EmailKind::Invitation);
}

#[tokio::test]
async fn admins_and_supervisors_can_impersonate_a_volunteer() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let supervisor = create_user(&app, &org, UserRole::Supervisor, "sup@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;

    for actor in [&admin, &supervisor] {
        let mut session = session_for(actor);
        let outcome = app
            .volunteer_service
            .impersonate(volunteer.id, &mut session, &auth_for(actor))
            .await
            .unwrap();

        assert!(outcome.authorized);
        assert_eq!(outcome.redirect, RedirectTarget::Home);
        assert_eq!(session.current_user().user_id, volunteer.id);
        assert_eq!(session.true_user().user_id, actor.id);
    }
}

#[tokio::test]
async fn a_volunteers_case_list_holds_only_their_own_assignments() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;
    let other = create_user(&app, &org, UserRole::Volunteer, "other@example.com").await;
    let assigned = create_case(&app, &org, "CINA-1").await;
    let other_case = create_case(&app, &org, "CINA-2").await;
    app.case_repo.assign_volunteer(assigned.id, volunteer.id).await.unwrap();
    app.case_repo.assign_volunteer(other_case.id, other.id).await.unwrap();

    let cases = app.case_repo.find_for_volunteer(volunteer.id).await.unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].id, assigned.id);
}

#[tokio::test]
async fn a_volunteer_cannot_impersonate_another_volunteer() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let actor = create_user(&app, &org, UserRole::Volunteer, "actor@example.com").await;
    let other = create_user(&app, &org, UserRole::Volunteer, "other@example.com").await;

    let mut session = session_for(&actor);
    let outcome = app
        .volunteer_service
        .impersonate(other.id, &mut session, &auth_for(&actor))
        .await
        .unwrap();

    assert!(!outcome.authorized);
    assert_eq!(outcome.redirect, RedirectTarget::Home);
    assert_eq!(
        outcome.notice,
        "Sorry, you are not authorized to perform this action."
    );
    // The acting session identity is unchanged
    assert!(!session.is_impersonating());
    assert_eq!(session.current_user().user_id, actor.id);
}
