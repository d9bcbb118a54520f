pub mod has_permission;
pub mod policy;

pub use has_permission::{Permission, UserRole};
pub use policy::{decide, Decision, ResourceRef};
