//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、登出、当前用户
//! - [`sweets`] - 商品库存管理接口

pub mod auth;
pub mod health;
pub mod sweets;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
