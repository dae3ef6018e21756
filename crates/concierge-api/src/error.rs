//! API error types and JSON error response formatting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use concierge_core::ConciergeError;
use serde::Serialize;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
///
/// Rejected chat input is not an error here; handlers report it through
/// the `accepted` flag instead.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - malformed request metadata.
    BadRequest(String),
    /// 404 Not Found - unknown session.
    NotFound(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConciergeError> for ApiError {
    fn from(err: ConciergeError) -> Self {
        match err {
            ConciergeError::Config(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_from_concierge_error() {
        let err: ApiError = ConciergeError::Config("bad port".into()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "bad port"));

        let err: ApiError = ConciergeError::Api("bind failed".into()).into();
        assert!(matches!(err, ApiError::Internal(ref m) if m.contains("bind failed")));
    }
}
