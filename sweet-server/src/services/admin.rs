//! 管理员账号初始化
//!
//! 服务器启动 (配置了 ADMIN_EMAIL / ADMIN_PASSWORD) 和 `seed-admin` 命令共用。

use std::fmt;

use shared::models::{Role, normalize_email};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::NewUser;
use crate::db::repository::{RepoError, RepoResult, UserRepository};

/// `ensure_admin` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    Created,
    AlreadyExists,
}

impl fmt::Display for AdminOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminOutcome::Created => f.write_str("created"),
            AdminOutcome::AlreadyExists => f.write_str("already exists"),
        }
    }
}

/// 确保管理员账号存在 (幂等)
///
/// 邮箱已存在时不做任何修改，包括该账号的角色和密码。
pub async fn ensure_admin(
    db: &Surreal<Db>,
    email: &str,
    password: &str,
    name: &str,
) -> RepoResult<AdminOutcome> {
    let repo = UserRepository::new(db.clone());
    let email = normalize_email(email);

    if repo.find_by_email(&email).await?.is_some() {
        return Ok(AdminOutcome::AlreadyExists);
    }

    let created = repo
        .create(NewUser {
            name: name.trim().to_string(),
            email: email.clone(),
            password: password.to_string(),
            role: Role::Admin,
        })
        .await;

    match created {
        Ok(user) => {
            crate::security_log!("INFO", "admin_created", user_id = user.key(), email = email);
            Ok(AdminOutcome::Created)
        }
        // 并发启动时另一个进程抢先创建
        Err(RepoError::Duplicate(_)) => Ok(AdminOutcome::AlreadyExists),
        Err(e) => Err(e),
    }
}
