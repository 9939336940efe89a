//! Sweet API Handlers

use axum::{Json, extract::State};
use http::StatusCode;
use shared::models::{StockChange, Sweet, SweetCreate, SweetSearch, SweetUpdate};

use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::{RepoError, SweetRepository};
use crate::utils::{AppError, AppResult, ErrorCode, SweetId, ValidatedJson, ValidatedQuery};

/// Map repository errors to sweet-specific API errors
fn sweet_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(_) => AppError::new(ErrorCode::SweetNotFound),
        RepoError::Duplicate(_) => AppError::new(ErrorCode::SweetNameExists),
        other => other.into(),
    }
}

fn repo(state: &ServerState) -> SweetRepository {
    SweetRepository::new(state.get_db())
}

/// GET /api/sweets - 获取所有商品 (最新优先)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Sweet>>> {
    let sweets = repo(&state).find_all().await.map_err(sweet_error)?;
    Ok(Json(sweets.into_iter().map(Sweet::from).collect()))
}

/// GET /api/sweets/search - 条件搜索 + 分页
pub async fn search(
    State(state): State<ServerState>,
    ValidatedQuery(params): ValidatedQuery<SweetSearch>,
) -> AppResult<Json<Vec<Sweet>>> {
    let sweets = repo(&state).search(&params).await.map_err(sweet_error)?;
    Ok(Json(sweets.into_iter().map(Sweet::from).collect()))
}

/// GET /api/sweets/{id}
pub async fn get_by_id(State(state): State<ServerState>, id: SweetId) -> AppResult<Json<Sweet>> {
    let sweet = repo(&state)
        .find_by_id(id.as_str())
        .await
        .map_err(sweet_error)?
        .ok_or_else(|| AppError::new(ErrorCode::SweetNotFound))?;
    Ok(Json(sweet.into()))
}

/// POST /api/sweets - 创建商品 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(payload): ValidatedJson<SweetCreate>,
) -> AppResult<(StatusCode, Json<Sweet>)> {
    let sweet = Sweet::from(repo(&state).create(payload).await.map_err(sweet_error)?);

    tracing::info!(
        sweet_id = %sweet.id,
        name = %sweet.name,
        admin_id = %admin.id,
        "Sweet created"
    );
    Ok((StatusCode::CREATED, Json(sweet)))
}

/// PUT /api/sweets/{id} - 部分更新 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    id: SweetId,
    ValidatedJson(payload): ValidatedJson<SweetUpdate>,
) -> AppResult<Json<Sweet>> {
    let sweet = repo(&state)
        .update(id.as_str(), payload)
        .await
        .map_err(sweet_error)?;

    tracing::info!(sweet_id = %id.as_str(), admin_id = %admin.id, "Sweet updated");
    Ok(Json(sweet.into()))
}

/// DELETE /api/sweets/{id} - 删除 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    id: SweetId,
) -> AppResult<StatusCode> {
    repo(&state)
        .delete(id.as_str())
        .await
        .map_err(sweet_error)?;

    tracing::info!(sweet_id = %id.as_str(), admin_id = %admin.id, "Sweet deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sweets/{id}/purchase - 购买 (库存原子扣减)
pub async fn purchase(
    State(state): State<ServerState>,
    user: CurrentUser,
    id: SweetId,
    ValidatedJson(change): ValidatedJson<StockChange>,
) -> AppResult<Json<Sweet>> {
    let sweet = repo(&state)
        .purchase(id.as_str(), change.quantity)
        .await
        .map_err(|e| {
            if let RepoError::InsufficientStock { available, .. } = &e {
                tracing::info!(
                    sweet_id = %id.as_str(),
                    requested = change.quantity,
                    available = *available,
                    "Purchase rejected: insufficient stock"
                );
            }
            sweet_error(e)
        })?;

    tracing::info!(
        sweet_id = %sweet.key(),
        user_id = %user.id,
        quantity = change.quantity,
        remaining = sweet.quantity,
        "Sweet purchased"
    );
    Ok(Json(sweet.into()))
}

/// POST /api/sweets/{id}/restock - 补货 (管理员)
pub async fn restock(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    id: SweetId,
    ValidatedJson(change): ValidatedJson<StockChange>,
) -> AppResult<Json<Sweet>> {
    let sweet = repo(&state)
        .restock(id.as_str(), change.quantity)
        .await
        .map_err(sweet_error)?;

    tracing::info!(
        sweet_id = %sweet.key(),
        admin_id = %admin.id,
        quantity = change.quantity,
        total = sweet.quantity,
        "Sweet restocked"
    );
    Ok(Json(sweet.into()))
}
