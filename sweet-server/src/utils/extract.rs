//! 带校验的请求提取器
//!
//! - [`ValidatedJson`] - JSON body + `validator` 规则
//! - [`ValidatedQuery`] - 查询参数 + `validator` 规则
//! - [`SweetId`] - 路径中的 sweet id

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;
use shared::models::is_valid_sweet_id;
use validator::Validate;

use crate::utils::{AppError, ErrorCode};

/// JSON body that passed `Validate`
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::validation_errors(vec![rejection.body_text()])
}

/// Query string that passed `Validate`
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::validation_errors(vec![rejection.body_text()])
}

/// `{id}` path segment checked to be a sweet key (1..=64 ASCII alphanumerics)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweetId(pub String);

impl<S> FromRequestParts<S> for SweetId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::new(ErrorCode::InvalidSweetId))?;
        if !is_valid_sweet_id(&id) {
            return Err(AppError::new(ErrorCode::InvalidSweetId));
        }
        Ok(Self(id))
    }
}

impl SweetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
