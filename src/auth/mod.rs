pub mod context;
pub mod service;
pub mod session;
mod repository;

// Re-export public items
pub use context::AuthContext;
pub use service::{AuthService, LoginResult};
pub use session::{Identity, Session};

// Export internal items for use within auth module
pub(crate) use repository::AuthRepository;
