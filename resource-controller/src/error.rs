//! Crate-level error type and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised outside the controller actions: configuration, startup and
/// serialization of response payloads
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a response payload failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type alias using the crate `Error`
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable machine-readable code reported in the response body
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show clients; details stay in the logs
    fn public_message(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => "Service is misconfigured",
            Error::Serialization(_) => "Failed to serialize response",
            Error::Io(_) | Error::Internal(_) => "Internal server error",
        }
    }
}

/// Body of a crate-level error response
///
/// ```json
/// {"error": "Failed to serialize response", "code": "SERIALIZATION_ERROR", "status": 500}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.public_message().to_string(),
            code: err.code().to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, code = self.code(), "Request failed");
        let body = ErrorResponse::from(&self);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_body() {
        let err = Error::InvalidConfig("max_per_page must be at least 1".to_string());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status, 500);
        assert_eq!(body.code, "CONFIG_ERROR");
        assert_eq!(body.error, "Service is misconfigured");
    }

    #[test]
    fn test_serialization_error_is_500() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let response = Error::from(json_err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_message_is_not_exposed() {
        let err = Error::Internal("pool exhausted at 10.0.0.3".to_string());
        assert!(err.to_string().contains("pool exhausted"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
