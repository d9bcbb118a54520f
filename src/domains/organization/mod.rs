pub mod repository;
pub mod types;

pub use repository::{CasaOrgRepository, SqliteCasaOrgRepository};
pub use types::{CasaOrg, NewCasaOrg};
