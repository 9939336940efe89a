use thiserror::Error;

/// 服务器启动/运行错误
///
/// 处理器内的错误使用 [`AppError`](crate::AppError)，这里只覆盖进程级失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器操作的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
