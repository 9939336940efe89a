//! 创建管理员账号
//!
//! ```text
//! ADMIN_PASSWORD=... [ADMIN_EMAIL=admin@sweetshop.com] [ADMIN_NAME=...] cargo run --bin seed-admin
//! ```
//!
//! 直接打开 RocksDB，服务器运行时不能执行 (数据库被锁定)。

use anyhow::{Context, bail};
use sweet_server::db::DbService;
use sweet_server::services::ensure_admin;
use sweet_server::{Config, init_logger};

const DEFAULT_ADMIN_EMAIL: &str = "admin@sweetshop.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger().map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;

    let email = env_or("ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);
    let name = env_or("ADMIN_NAME", "Admin User");
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ => bail!("ADMIN_PASSWORD must be set"),
    };

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.uses_memory_db() {
        bail!("DATABASE_PATH=memory: nothing to seed");
    }
    config.ensure_work_dir_structure()?;

    let db = DbService::open(&config)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;

    let outcome = ensure_admin(&db.db, &email, &password, &name).await?;
    println!("Admin {email}: {outcome}");
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
