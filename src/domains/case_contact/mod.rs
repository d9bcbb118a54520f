pub mod repository;
pub mod types;

pub use repository::{CaseContactRepository, SqliteCaseContactRepository};
pub use types::{CaseContact, NewCaseContact};
