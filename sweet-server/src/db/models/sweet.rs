//! Sweet Model

use serde::{Deserialize, Serialize};
use shared::models::Sweet;
use surrealdb::RecordId;

use super::record_key;
use crate::utils::time::millis_to_rfc3339;

/// Sweet record matching the `sweet` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweetRecord {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub description: Option<String>,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

impl SweetRecord {
    pub fn key(&self) -> String {
        record_key(&self.id)
    }
}

impl From<SweetRecord> for Sweet {
    fn from(record: SweetRecord) -> Self {
        Self {
            id: record.key(),
            name: record.name,
            category: record.category,
            price: record.price,
            quantity: record.quantity,
            description: record.description,
            created_at: millis_to_rfc3339(record.created_at),
            updated_at: millis_to_rfc3339(record.updated_at),
        }
    }
}
