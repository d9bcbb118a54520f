use crate::domains::case_contact::types::CaseContact;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row in the reimbursement queue, derived from a case contact that
/// requested driving reimbursement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReimbursementEntry {
    pub case_contact_id: Uuid,
    pub casa_case_id: Uuid,
    pub volunteer_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub miles_driven: Decimal,
    pub complete: bool,
}

impl From<CaseContact> for ReimbursementEntry {
    fn from(contact: CaseContact) -> Self {
        Self {
            case_contact_id: contact.id,
            casa_case_id: contact.casa_case_id,
            volunteer_id: contact.creator_id,
            occurred_at: contact.occurred_at,
            miles_driven: contact.miles_driven,
            complete: contact.reimbursement_complete,
        }
    }
}
