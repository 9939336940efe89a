//! Data models
//!
//! Shared between sweet-server and sweet-client (via API).
//! JSON field names are camelCase to match the web UI.

pub mod sweet;
pub mod user;

// Re-exports
pub use sweet::*;
pub use user::*;
