//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::{Role, User};
use thiserror::Error;

/// JWT 密钥最小长度
pub const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字符)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// | 环境变量 | 默认值 |
    /// |----------|--------|
    /// | JWT_SECRET | 非生产的 debug 构建随机生成, 其他情况必填 |
    /// | JWT_EXPIRATION_MINUTES | 1440 |
    /// | JWT_ISSUER | sweet-shop |
    /// | JWT_AUDIENCE | sweet-shop-clients |
    pub fn from_env(production: bool) -> Result<Self, JwtError> {
        Ok(Self {
            secret: load_jwt_secret(production)?,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|m: &i64| *m > 0)
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "sweet-shop".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "sweet-shop-clients".to_string()),
        })
    }

    /// 测试用固定配置
    pub fn for_tests() -> Self {
        Self {
            secret: "sweet-shop-test-secret-0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "sweet-shop".to_string(),
            audience: "sweet-shop-clients".to_string(),
        }
    }

    /// 令牌有效期 (秒)，与会话 Cookie 的 Max-Age 一致
    pub fn lifetime_seconds(&self) -> i64 {
        self.expiration_minutes * 60
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 显示名称
    pub name: String,
    /// 邮箱
    pub email: String,
    /// 角色 (admin | user)
    pub role: Role,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes).map_err(|_| {
        JwtError::ConfigError("Failed to generate secure random key".to_string())
    })?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED[*b as usize % ALLOWED.len()] as char)
        .collect())
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret(production: bool) -> Result<String, JwtError> {
    resolve_jwt_secret(std::env::var("JWT_SECRET").ok(), production)
}

/// 校验已配置的密钥；未配置时只有非生产的 debug 构建会生成临时密钥
fn resolve_jwt_secret(configured: Option<String>, production: bool) -> Result<String, JwtError> {
    if let Some(secret) = configured {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::ConfigError(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }
        return Ok(secret);
    }

    if production || !cfg!(debug_assertions) {
        return Err(JwtError::ConfigError(
            "JWT_SECRET environment variable must be set in production!".to_string(),
        ));
    }

    tracing::warn!("⚠️  JWT_SECRET not set! Generating secure temporary key for development.");
    generate_secure_printable_jwt_secret()
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        self.generate_token_at(user, Utc::now().timestamp())
    }

    fn generate_token_at(&self, user: &User, issued_at: i64) -> Result<String, JwtError> {
        let expiration = issued_at + Duration::minutes(self.config.expiration_minutes).num_seconds();

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
            iat: issued_at,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求扩展
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 邮箱
    pub email: String,
    /// 角色
    pub role: Role,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "3b0c1f2a9d8e4c7b8a6f5e4d3c2b1a09".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = JwtService::with_config(JwtConfig::for_tests());

        let token = service
            .generate_token(&user(Role::Admin))
            .expect("Failed to generate test token");
        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "3b0c1f2a9d8e4c7b8a6f5e4d3c2b1a09");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, "sweet-shop");
        assert_eq!(claims.exp - claims.iat, 3600);

        let current = CurrentUser::from(claims);
        assert!(current.is_admin());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let service = JwtService::with_config(JwtConfig::for_tests());
        // Issued two hours ago with a one hour lifetime, well past the default leeway
        let issued_at = Utc::now().timestamp() - 7200;
        let token = service
            .generate_token_at(&user(Role::User), issued_at)
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let service = JwtService::with_config(JwtConfig::for_tests());
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-that-is-long-enough-000".to_string(),
            ..JwtConfig::for_tests()
        });

        let token = other.generate_token(&user(Role::User)).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let service = JwtService::with_config(JwtConfig::for_tests());
        let other = JwtService::with_config(JwtConfig {
            audience: "someone-else".to_string(),
            ..JwtConfig::for_tests()
        });

        let token = other.generate_token(&user(Role::User)).unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token() {
        let service = JwtService::with_config(JwtConfig::for_tests());
        assert!(matches!(
            service.validate_token("not.a.jwt"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_production_requires_configured_secret() {
        assert!(matches!(
            resolve_jwt_secret(None, true),
            Err(JwtError::ConfigError(_))
        ));

        let configured = "p".repeat(MIN_SECRET_LEN);
        assert_eq!(
            resolve_jwt_secret(Some(configured.clone()), true).unwrap(),
            configured
        );
        assert!(resolve_jwt_secret(Some("short".into()), false).is_err());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_development_generates_secret() {
        let secret = resolve_jwt_secret(None, false).unwrap();
        assert!(secret.len() >= MIN_SECRET_LEN);
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_secure_printable_jwt_secret().unwrap();
        let b = generate_secure_printable_jwt_secret().unwrap();
        assert_eq!(a.len(), 64);
        assert!(a.len() >= MIN_SECRET_LEN);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_graphic()));
    }
}
