//! Sweets Routes
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/sweets | GET | 登录用户 |
//! | /api/sweets | POST | 管理员 |
//! | /api/sweets/search | GET | 登录用户 |
//! | /api/sweets/{id} | GET | 登录用户 |
//! | /api/sweets/{id} | PUT / DELETE | 管理员 |
//! | /api/sweets/{id}/purchase | POST | 登录用户 |
//! | /api/sweets/{id}/restock | POST | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/sweets", get(handler::list).post(handler::create))
        .route("/api/sweets/search", get(handler::search))
        .route(
            "/api/sweets/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/api/sweets/{id}/purchase", post(handler::purchase))
        .route("/api/sweets/{id}/restock", post(handler::restock))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
