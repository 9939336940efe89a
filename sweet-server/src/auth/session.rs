//! 会话传输 - `token` Cookie 与 Bearer 头

use http::header::{AUTHORIZATION, COOKIE};
use http::{HeaderMap, HeaderValue};

use crate::AppError;
use crate::auth::JwtService;

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "token";

/// 从请求头提取令牌
///
/// 优先读取 `token` Cookie，没有时再读 `Authorization: Bearer <jwt>`。
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_from_header)
            .map(str::to_string)
    })
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// 构造会话 Cookie
///
/// `token=<jwt>; HttpOnly; Path=/; SameSite=Lax; Max-Age=<秒>`，生产环境追加 `Secure`
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        max_age_secs.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid session cookie: {}", e)))
}

/// 清除会话 Cookie (Max-Age=0)
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    let cookie = if secure {
        "token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0; Secure"
    } else {
        "token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0"
    };
    HeaderValue::from_static(cookie)
}
