//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`homestream_common::Error`] so that route
//! handlers can return `Result<T, ApiError>` and use `?` on catalog and
//! storage calls.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use homestream_common::Error;
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        Self(Error::not_found(what))
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(Error::invalid_input(msg))
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self(Error::rejected(msg))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self(Error::internal(msg))
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        Self(Error::invalid_input(format!("invalid multipart body: {}", e.body_text())))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.0,
                "Server error in API handler"
            );
        }

        let code = match &self.0 {
            Error::NotFound(_) => "not_found",
            Error::InvalidInput(_) => "invalid_input",
            Error::Rejected(_) => "bad_request",
            Error::PayloadTooLarge { .. } => "payload_too_large",
            Error::Database(_) => "database_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.0.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
