use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 内存数据库标记 (`DATABASE_PATH=memory`)
pub const MEMORY_DATABASE: &str = "memory";

const PRODUCTION: &str = "production";

/// 默认允许的前端来源 (Vite dev server / 本地预览)
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:5173,http://localhost:5174,http://localhost:3000,http://localhost:3001";

/// 启动时确保存在的管理员账号
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3001 | HTTP 服务端口 |
/// | WORK_DIR | ./data | 工作目录 (database/, logs/) |
/// | DATABASE_PATH | WORK_DIR/database/sweet-shop.db | RocksDB 目录, `memory` 为内存库 |
/// | ENVIRONMENT | development | development / test / production |
/// | CORS_ORIGINS | localhost:5173,... | 逗号分隔 |
/// | LOGIN_DELAY_MS | 300 | 登录固定延迟 |
/// | ALLOW_ADMIN_SIGNUP | false | 注册时是否允许 role=admin |
/// | ADMIN_EMAIL / ADMIN_PASSWORD / ADMIN_NAME | - / - / Admin User | 启动时创建管理员 |
/// | LOG_LEVEL / LOG_JSON / LOG_DIR | info / false / - | 日志 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时 |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_PATH=memory cargo run -p sweet-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库路径，`memory` 表示内存引擎
    pub database_path: String,
    /// 运行环境: development | test | production
    pub environment: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// CORS 允许的来源
    pub cors_origins: Vec<String>,
    /// 登录响应前的固定延迟 (毫秒)
    pub login_delay_ms: u64,
    /// 是否允许通过注册接口创建管理员
    pub allow_admin_signup: bool,
    /// 启动时确保存在的管理员
    pub admin_seed: Option<AdminSeed>,
    /// 默认日志级别 (RUST_LOG 优先)
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 日志文件目录
    pub log_dir: Option<String>,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值。JWT 密钥无效时返回错误。
    pub fn from_env() -> Result<Self, ServerError> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = env_non_empty("DATABASE_PATH").unwrap_or_else(|| {
            PathBuf::from(&work_dir)
                .join("database")
                .join("sweet-shop.db")
                .to_string_lossy()
                .into_owned()
        });

        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == PRODUCTION)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let admin_seed = match (env_non_empty("ADMIN_EMAIL"), env_non_empty("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                email,
                password,
                name: env_non_empty("ADMIN_NAME").unwrap_or_else(|| "Admin User".into()),
            }),
            _ => None,
        };

        Ok(Self {
            http_port: env_parse("HTTP_PORT", 3001),
            database_path,
            work_dir,
            environment,
            jwt,
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            login_delay_ms: env_parse("LOGIN_DELAY_MS", 300),
            allow_admin_signup: env_parse("ALLOW_ADMIN_SIGNUP", false),
            admin_seed,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: env_non_empty("LOG_DIR"),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10_000),
        })
    }

    /// 使用自定义值覆盖部分配置
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
    ) -> Result<Self, ServerError> {
        let mut config = Self::from_env()?;
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.database_path = config
            .database_dir()
            .join("sweet-shop.db")
            .to_string_lossy()
            .into_owned();
        Ok(config)
    }

    /// 测试配置 - 不读取环境变量
    ///
    /// 内存数据库、无登录延迟、固定 JWT 密钥
    pub fn for_tests() -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            http_port: 0,
            database_path: MEMORY_DATABASE.into(),
            environment: "test".into(),
            jwt: JwtConfig::for_tests(),
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            login_delay_ms: 0,
            allow_admin_signup: true,
            admin_seed: None,
            log_level: "warn".into(),
            log_json: false,
            log_dir: None,
            shutdown_timeout_ms: 1_000,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION
    }

    /// 是否使用内存数据库
    pub fn uses_memory_db(&self) -> bool {
        self.database_path == MEMORY_DATABASE
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        if self.uses_memory_db() {
            return Ok(());
        }
        if let Some(parent) = PathBuf::from(&self.database_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
