//! Shared types for the Sweet Shop API
//!
//! Error codes, the error body, and the user / sweet models used by both
//! the server and the client.

pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
