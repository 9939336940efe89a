//! Database Module
//!
//! Embedded SurrealDB (RocksDB on disk, in-memory for tests) and schema setup

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::core::Config;
use crate::utils::AppError;

pub const NAMESPACE: &str = "sweet_shop";
pub const DATABASE: &str = "main";

const SCHEMA: &str = include_str!("schema.surql");

/// Database service, owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the database selected by `DATABASE_PATH`
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        if config.uses_memory_db() {
            Self::memory().await
        } else {
            Self::new(&config.database_path).await
        }
    }

    /// Open (or create) a RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_path, "Database connection established (RocksDB)");
        Self::setup(db).await
    }

    /// In-memory database, used by tests and `DATABASE_PATH=memory`
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        tracing::info!("Database connection established (memory)");
        Self::setup(db).await
    }

    async fn setup(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}
