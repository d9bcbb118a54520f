mod common;

use casa_core::errors::{DomainError, ServiceError};
use casa_core::types::{PaginationParams, UserRole};

use common::*;

#[tokio::test]
async fn the_queue_never_contains_another_orgs_contacts() {
    let app = setup().await;
    let org1 = create_org(&app, "Prince George CASA").await;
    let org2 = create_org(&app, "Montgomery CASA").await;

    let admin = create_user(&app, &org1, UserRole::CasaAdmin, "admin@example.com").await;
    let vol1 = create_user(&app, &org1, UserRole::Volunteer, "vol1@example.com").await;
    let vol2 = create_user(&app, &org2, UserRole::Volunteer, "vol2@example.com").await;

    let case1 = create_case(&app, &org1, "CINA-1").await;
    let case2 = create_case(&app, &org2, "CINA-2").await;

    let contact1 = create_reimbursable_contact(&app, &case1, &vol1).await;
    let contact2 = create_reimbursable_contact(&app, &case2, &vol2).await;

    let page = app
        .reimbursement_service
        .list(PaginationParams::default(), &auth_for(&admin))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert!(page.items.iter().any(|e| e.case_contact_id == contact1.id));
    assert!(page.items.iter().all(|e| e.case_contact_id != contact2.id));
}

#[tokio::test]
async fn supervisors_and_volunteers_cannot_view_the_queue() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let supervisor = create_user(&app, &org, UserRole::Supervisor, "sup@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;

    for actor in [&supervisor, &volunteer] {
        let result = app
            .reimbursement_service
            .list(PaginationParams::default(), &auth_for(actor))
            .await;
        assert!(matches!(result, Err(ServiceError::PermissionDenied(_))));
    }
}

#[tokio::test]
async fn an_admin_can_flip_completion_status() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;
    let case = create_case(&app, &org, "CINA-1").await;
    let contact = create_reimbursable_contact(&app, &case, &volunteer).await;
    assert!(!contact.reimbursement_complete);

    let entry = app
        .reimbursement_service
        .mark_complete(contact.id, true, &auth_for(&admin))
        .await
        .unwrap();
    assert!(entry.complete);

    let entry = app
        .reimbursement_service
        .mark_complete(contact.id, false, &auth_for(&admin))
        .await
        .unwrap();
    assert!(!entry.complete);
}

#[tokio::test]
async fn a_cross_org_contact_reads_as_not_found() {
    let app = setup().await;
    let org1 = create_org(&app, "Prince George CASA").await;
    let org2 = create_org(&app, "Montgomery CASA").await;
    let admin = create_user(&app, &org1, UserRole::CasaAdmin, "admin@example.com").await;
    let vol2 = create_user(&app, &org2, UserRole::Volunteer, "vol2@example.com").await;
    let case2 = create_case(&app, &org2, "CINA-2").await;
    let contact2 = create_reimbursable_contact(&app, &case2, &vol2).await;

    let result = app
        .reimbursement_service
        .mark_complete(contact2.id, true, &auth_for(&admin))
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::EntityNotFound(_, _)))
    ));

    // And the record itself is untouched
    let reloaded = app.contact_repo.find_by_id(contact2.id).await.unwrap();
    assert!(!reloaded.reimbursement_complete);
}

#[tokio::test]
async fn pagination_reports_totals() {
    let app = setup().await;
    let org = create_org(&app, "Prince George CASA").await;
    let admin = create_user(&app, &org, UserRole::CasaAdmin, "admin@example.com").await;
    let volunteer = create_user(&app, &org, UserRole::Volunteer, "vol@example.com").await;
    let case = create_case(&app, &org, "CINA-1").await;

    for _ in 0..3 {
        create_reimbursable_contact(&app, &case, &volunteer).await;
    }

    let page = app
        .reimbursement_service
        .list(PaginationParams { page: 1, per_page: 2 }, &auth_for(&admin))
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 2);
}
