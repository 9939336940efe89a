use axum::Router;
use axum::response::IntoResponse;
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::{AppError, ErrorCode};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no global middleware, no state)
///
/// Protected routers carry their own `require_auth` route layer, so paths
/// that match nothing fall through to the 404 fallback.
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Health API - public
        .merge(api::health::router())
        // Auth API - public, except /me
        .merge(api::auth::router(state))
        // Sweets API - authentication required
        .merge(api::sweets::router(state))
        .fallback(route_not_found)
}

/// Build a fully configured application with all middleware
///
/// Used by both the HTTP server and the in-process tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router(state)
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // CORS - configured origins, cookies allowed
        .layer(cors_layer(&state.config))
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID - outermost, generated before anything else runs
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn route_not_found() -> impl IntoResponse {
    AppError::new(ErrorCode::RouteNotFound)
}
