//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 简单健康检查 | 无 |
//! | /health/detailed | GET | 详细健康检查 (数据库不可用时 503) | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "OK",
//!   "timestamp": "2024-01-01T12:00:00.000Z"
//! }
//! ```

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::time::now_rfc3339;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

/// 简单健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 固定为 "OK"
    pub status: String,
    /// RFC 3339 时间戳
    pub timestamp: String,
}

/// 详细健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// OK | DEGRADED
    pub status: String,
    pub timestamp: String,
    pub version: String,
    /// 运行时间 (秒)
    pub uptime_seconds: u64,
    /// 各组件检查结果
    pub checks: HealthChecks,
}

/// 健康检查详情
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    /// 数据库检查
    pub database: CheckResult,
}

/// 单项检查结果
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResult {
    /// 状态 (ok | error)
    pub status: String,
    /// 延迟 (毫秒)
    pub latency_ms: Option<u64>,
    /// 错误信息
    pub message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok".into(),
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            latency_ms: None,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// 基础健康检查
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".into(),
        timestamp: now_rfc3339(),
    })
}

/// 数据库检查结果，错误细节只写日志
fn database_check<T, E: std::fmt::Display>(outcome: Result<T, E>, started: Instant) -> CheckResult {
    match outcome {
        Ok(_) => CheckResult::ok_with_latency(started.elapsed().as_millis() as u64),
        Err(e) => {
            tracing::error!(error = %e, "Health check: database unavailable");
            CheckResult::error("Database unavailable")
        }
    }
}

/// 包含组件状态的详细健康检查
pub async fn detailed_health(
    State(state): State<ServerState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let db_start = Instant::now();
    let outcome = state
        .get_db()
        .query("RETURN 1")
        .await
        .and_then(|response| response.check());
    let db_check = database_check(outcome, db_start);

    let (status_code, status) = if db_check.is_ok() {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED")
    };

    (
        status_code,
        Json(DetailedHealthResponse {
            status: status.into(),
            timestamp: now_rfc3339(),
            version: env!("CARGO_PKG_VERSION").into(),
            uptime_seconds: state.uptime_seconds(),
            checks: HealthChecks { database: db_check },
        }),
    )
}
