//! User Repository

use super::{BaseRepository, RepoError, RepoResult, thing};
use crate::db::models::{NewUser, UserRecord, new_record_id};
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id (bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<UserRecord>> {
        let thing = thing("user", id)?;
        let user: Option<UserRecord> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by normalized email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<UserRecord> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user, hashing the password
    pub async fn create(&self, data: NewUser) -> RepoResult<UserRecord> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already exists",
                data.email
            )));
        }

        let hash_pass = UserRecord::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE $thing SET
                    name = $name,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    created_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", new_record_id("user")))
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role.as_str()))
            .bind(("now", now_millis()))
            .await?;

        let created: Option<UserRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
