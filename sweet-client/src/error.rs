//! Client error types

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, parsed from the server's error body
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<u16>,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Error code of an API error
    pub fn code(&self) -> Option<u16> {
        match self {
            ClientError::Api { code, .. } => *code,
            _ => None,
        }
    }

    /// Field messages of a validation error (`details.errors`)
    pub fn field_errors(&self) -> Vec<String> {
        match self {
            ClientError::Api {
                details: Some(details),
                ..
            } => details
                .get("errors")
                .and_then(Value::as_array)
                .map(|errors| {
                    errors
                        .iter()
                        .filter_map(|e| e.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let mut details = HashMap::new();
        details.insert(
            "errors".to_string(),
            serde_json::json!(["Valid email is required"]),
        );
        let err = ClientError::Api {
            status: 400,
            code: Some(2),
            message: "Valid email is required".into(),
            details: Some(details),
        };

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), Some(2));
        assert_eq!(err.field_errors(), vec!["Valid email is required"]);
        assert_eq!(err.to_string(), "API error 400: Valid email is required");
    }
}
