//! Repository Module
//!
//! CRUD operations for the SurrealDB tables.

pub mod sweet;
pub mod user;

pub use sweet::SweetRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // unique index violation
        if message.contains("already contains") {
            RepoError::Duplicate(message)
        } else {
            RepoError::Database(message)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::InsufficientStock {
                requested,
                available,
            } => AppError::new(ErrorCode::InsufficientStock)
                .with_detail("requested", requested)
                .with_detail("available", available),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Record id for a bare key, rejecting keys that are not plain identifiers
pub(crate) fn thing(table: &str, key: &str) -> RepoResult<RecordId> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(RepoError::Validation(format!("Invalid ID: {}", key)));
    }
    Ok(RecordId::from_table_key(table, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thing_rejects_bad_keys() {
        assert!(thing("sweet", "abc123").is_ok());
        assert!(matches!(thing("sweet", ""), Err(RepoError::Validation(_))));
        assert!(matches!(
            thing("sweet", "abc; DELETE sweet"),
            Err(RepoError::Validation(_))
        ));
    }

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::Duplicate("x".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = RepoError::InsufficientStock {
            requested: 5,
            available: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock");

        let err: AppError = RepoError::Database("boom".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
