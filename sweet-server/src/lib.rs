//! Sweet Shop Server - 甜品店库存 HTTP API
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB (RocksDB / 内存)
//! - **认证** (`auth`): JWT + Argon2，会话 Cookie 或 Bearer 头
//! - **HTTP API** (`api`): 认证、商品、库存、健康检查
//! - **服务** (`services`): 管理员账号初始化
//!
//! # 模块结构
//!
//! ```text
//! sweet-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT、会话 Cookie、中间件、提取器
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装和全局中间件
//! ├── services/      # 管理员初始化
//! ├── utils/         # 日志、时间、请求提取器
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use routes::build_app;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 写入 "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____                     __
  / ___/      _____  ___  / /_
  \__ \ | /| / / _ \/ _ \/ __/
 ___/ / |/ |/ /  __/  __/ /_
/____/|__/|__/\___/\___/\__/
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
                /_/
    "#
    );
}
