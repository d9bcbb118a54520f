use crate::auth::AuthContext;
use crate::domains::case_contact::repository::CaseContactRepository;
use crate::domains::permission::Permission;
use crate::domains::reimbursement::types::ReimbursementEntry;
use crate::errors::{ServiceError, ServiceResult};
use crate::types::{PaginatedResult, PaginationParams};
use std::sync::Arc;
use uuid::Uuid;

/// Admin-only view over driving reimbursement requests.
///
/// Scoping is a hard security invariant: listings are computed with a SQL
/// join on the owning case's organization, so records from other
/// organizations are excluded unconditionally.
pub struct ReimbursementService {
    contact_repo: Arc<dyn CaseContactRepository>,
}

impl ReimbursementService {
    pub fn new(contact_repo: Arc<dyn CaseContactRepository>) -> Self {
        Self { contact_repo }
    }

    /// The reimbursement queue for the actor's organization
    pub async fn list(
        &self,
        params: PaginationParams,
        auth: &AuthContext,
    ) -> ServiceResult<PaginatedResult<ReimbursementEntry>> {
        auth.authorize(Permission::ViewReimbursements)?;

        let (contacts, total) = self
            .contact_repo
            .find_reimbursable_in_org(auth.organization_id, params)
            .await
            .map_err(ServiceError::Domain)?;

        let entries = contacts.into_iter().map(ReimbursementEntry::from).collect();
        Ok(PaginatedResult::new(entries, total, params))
    }

    /// Flip the completion status of a reimbursement request. A contact in
    /// another organization is reported as not found, never revealed.
    pub async fn mark_complete(
        &self,
        case_contact_id: Uuid,
        complete: bool,
        auth: &AuthContext,
    ) -> ServiceResult<ReimbursementEntry> {
        auth.authorize(Permission::ManageReimbursements)?;

        let contact = self
            .contact_repo
            .set_reimbursement_complete(case_contact_id, auth.organization_id, complete)
            .await
            .map_err(ServiceError::Domain)?;

        log::info!(
            "Reimbursement for case contact {} marked {} by user {}",
            case_contact_id,
            if complete { "complete" } else { "incomplete" },
            auth.user_id
        );

        Ok(contact.into())
    }
}
