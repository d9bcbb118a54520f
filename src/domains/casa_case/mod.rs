pub mod repository;
pub mod types;

pub use repository::{CasaCaseRepository, SqliteCasaCaseRepository};
pub use types::{CasaCase, CaseAssignment, NewCasaCase};
