//! Authentication Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_auth;
use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/register, /api/auth/login, /api/auth/logout: public
/// - /api/auth/me: protected by `require_auth`
pub fn router(state: &ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/logout", post(handler::logout));

    let protected = Router::new()
        .route("/api/auth/me", get(handler::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}
