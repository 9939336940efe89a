//! 认证授权模块
//!
//! 提供 JWT 认证、会话 Cookie 和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] / [`AdminUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`session`] - `token` Cookie 读写

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod session;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{authenticate, require_auth};
