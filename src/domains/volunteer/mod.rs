pub mod service;
pub mod types;

pub use service::VolunteerService;
pub use types::{ActionOutcome, ActivationRedirect, NewVolunteer, RedirectTarget};
