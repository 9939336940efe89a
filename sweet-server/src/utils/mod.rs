//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`extract`] - 带校验的提取器
//! - 日志、时间等工具

pub mod extract;
pub mod logger;
pub mod time;

pub use extract::{SweetId, ValidatedJson, ValidatedQuery};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
