//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, Uri};

use crate::AppError;
use crate::auth::session::token_from_headers;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 从请求头解析并验证当前用户
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无令牌 | 401 NotAuthenticated |
/// | 令牌过期 | 403 TokenExpired |
/// | 无效令牌 | 403 TokenInvalid |
pub fn authenticate(headers: &HeaderMap, uri: &Uri, jwt: &JwtService) -> Result<CurrentUser, AppError> {
    let Some(token) = token_from_headers(headers) else {
        security_log!("WARN", "auth_missing", uri = uri.path());
        return Err(AppError::unauthorized());
    };

    match jwt.validate_token(&token) {
        Ok(claims) => Ok(CurrentUser::from(claims)),
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = uri.path()
            );
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token()),
            }
        }
    }
}

/// 认证中间件 - 要求用户登录
///
/// 只挂在受保护的路由上 (`route_layer`)，未知路径仍然返回 404。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS 预检由 CorsLayer 处理，这里直接放行
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let user = authenticate(req.headers(), req.uri(), &state.get_jwt_service())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
