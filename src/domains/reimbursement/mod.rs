pub mod service;
pub mod types;

pub use service::ReimbursementService;
pub use types::ReimbursementEntry;
