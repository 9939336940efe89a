//! Database Models
//!
//! Records as stored in SurrealDB. API-facing types live in `shared::models`.

pub mod sweet;
pub mod user;

pub use sweet::SweetRecord;
pub use user::{NewUser, UserRecord};

use surrealdb::RecordId;

/// Bare key of a record id (`sweet:⟨abc⟩` -> `abc`)
pub fn record_key(id: &RecordId) -> String {
    id.key()
        .to_string()
        .trim_matches(|c| c == '⟨' || c == '⟩' || c == '`')
        .to_string()
}

/// New record id with a random uuid key
pub fn new_record_id(table: &str) -> RecordId {
    RecordId::from_table_key(table, uuid::Uuid::new_v4().simple().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_strips_table() {
        let id = RecordId::from_table_key("sweet", "3b0c1f2a9d8e4c7b8a6f5e4d3c2b1a09");
        assert_eq!(record_key(&id), "3b0c1f2a9d8e4c7b8a6f5e4d3c2b1a09");
    }

    #[test]
    fn test_new_record_id_key() {
        let id = new_record_id("user");
        assert_eq!(id.table(), "user");
        let key = record_key(&id);
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
