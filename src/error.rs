//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] covers both sides of the service. Frame-level variants
//! are logged by the connection loop and never reach the client; the
//! HTTP-facing variants map to a status code and a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ConnectionId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "room not found: ROOM0042"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Service-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server / Relay  | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Frame is not valid JSON.
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    /// Frame is JSON but has no string `type` field.
    #[error("frame has no message type")]
    MissingType,

    /// `join` request with an empty room or unknown client type.
    #[error("invalid join: {0}")]
    InvalidJoin(String),

    /// Target connection's outbound queue is full.
    #[error("outbound queue full for connection {0}")]
    PeerBackpressure(ConnectionId),

    /// Target connection's transport has already shut down.
    #[error("connection {0} is closed")]
    PeerClosed(ConnectionId),

    /// No room with the given code exists.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedFrame(_) => 1001,
            Self::MissingType => 1002,
            Self::InvalidJoin(_) => 1003,
            Self::RoomNotFound(_) => 2001,
            Self::PeerBackpressure(_) => 3001,
            Self::PeerClosed(_) => 3002,
            Self::Config(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedFrame(_) | Self::MissingType | Self::InvalidJoin(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::PeerBackpressure(_) | Self::PeerClosed(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn room_not_found_maps_to_404() {
        let err = RelayError::RoomNotFound("R1".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn json_errors_convert_to_malformed() {
        let Err(json_err) = serde_json::from_str::<serde_json::Value>("{not json") else {
            panic!("invalid json should fail");
        };
        let err = RelayError::from(json_err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("malformed frame"));
    }
}
