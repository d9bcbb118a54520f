use crate::errors::DomainResult;
use crate::validation::{Validate, ValidationBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the caller should land after a lifecycle action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectTarget {
    Home,
    VolunteerEdit(Uuid),
    CasaCaseEdit(Uuid),
}

/// The user-visible result of a lifecycle action: a redirect target and a
/// flash notice. Authorization denial is a normal outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub redirect: RedirectTarget,
    pub notice: String,
    pub authorized: bool,
}

impl ActionOutcome {
    pub fn success(redirect: RedirectTarget, notice: impl Into<String>) -> Self {
        Self {
            redirect,
            notice: notice.into(),
            authorized: true,
        }
    }

    /// Denial lands on a safe default location, never on the target's page.
    pub fn denied() -> Self {
        Self {
            redirect: RedirectTarget::Home,
            notice: "Sorry, you are not authorized to perform this action.".to_string(),
            authorized: false,
        }
    }
}

/// Optional context for the post-activation redirect: when it names a case
/// the volunteer is assigned to, activation lands on that case's edit view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationRedirect {
    pub casa_case_id: Option<Uuid>,
}

impl ActivationRedirect {
    pub fn to_case(casa_case_id: Uuid) -> Self {
        Self {
            casa_case_id: Some(casa_case_id),
        }
    }
}

/// NewVolunteer DTO - invited accounts have no password yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVolunteer {
    pub email: String,
    pub display_name: String,
    pub casa_org_id: Uuid,
}

impl Validate for NewVolunteer {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("email", Some(self.email.clone()))
            .required()
            .email()
            .validate()?;

        ValidationBuilder::new("display_name", Some(self.display_name.clone()))
            .required()
            .min_length(2)
            .max_length(50)
            .validate()?;

        Ok(())
    }
}
