pub mod casa_case;
pub mod case_contact;
pub mod organization;
pub mod permission;
pub mod reimbursement;
pub mod user;
pub mod volunteer;
