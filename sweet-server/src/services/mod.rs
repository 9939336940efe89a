//! Services
//!
//! Business operations shared by the HTTP server and the command line tools.

pub mod admin;

pub use admin::{AdminOutcome, ensure_admin};
