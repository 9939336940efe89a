//! Sweet Shop Client
//!
//! Typed HTTP client for the Sweet Shop API.
//!
//! ```ignore
//! let mut client = SweetClient::new("http://localhost:3001")?;
//! client.login("admin@sweetshop.com", "admin123").await?;
//! let sweets = client.list_sweets().await?;
//! ```

pub mod client;
pub mod error;

pub use client::{HealthStatus, SweetClient};
pub use error::{ClientError, ClientResult};

// Re-export shared types for convenience
pub use shared::models::{
    Role, StockChange, Sweet, SweetCreate, SweetSearch, SweetUpdate, User,
};
