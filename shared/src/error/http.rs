//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RouteNotFound
            | Self::UserNotFound
            | Self::SweetNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::EmailAlreadyExists | Self::SweetNameExists => {
                StatusCode::CONFLICT
            }

            // 401 Unauthorized: no usable identity at all
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 403 Forbidden: a token was presented but is unusable, or the role is wrong
            Self::TokenExpired
            | Self::TokenInvalid
            | Self::PermissionDenied
            | Self::AdminRequired
            | Self::AdminSignupDisabled => StatusCode::FORBIDDEN,

            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation and stock errors)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InsufficientStock
            | Self::InvalidSweetId
            | Self::InvalidQuantity => StatusCode::BAD_REQUEST,
        }
    }
}
