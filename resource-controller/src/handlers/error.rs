//! API error type for controller actions
//!
//! Actions add no error handling of their own: a [`ServiceError`] raised by
//! the service is converted with `?` and rendered by the `IntoResponse` impl.
//!
//! # Example
//!
//! ```rust
//! use resource_controller::handlers::{ApiAction, ApiError, ApiErrorKind};
//! use resource_controller::service::ServiceError;
//!
//! let error = ApiError::from(ServiceError::not_found("User", "usr_123"));
//! assert_eq!(error.kind, ApiErrorKind::NotFound);
//! assert_eq!(error.action, ApiAction::Show);
//! assert_eq!(error.entity_id, Some("usr_123".to_string()));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::service::{ServiceError, ServiceErrorKind, ServiceOperation};

/// Controller action that was running when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiAction {
    Index,
    Create,
    Store,
    Show,
    Edit,
    Update,
    Destroy,
}

impl fmt::Display for ApiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => write!(f, "index"),
            Self::Create => write!(f, "create"),
            Self::Store => write!(f, "store"),
            Self::Show => write!(f, "show"),
            Self::Edit => write!(f, "edit"),
            Self::Update => write!(f, "update"),
            Self::Destroy => write!(f, "destroy"),
        }
    }
}

impl From<ServiceOperation> for ApiAction {
    fn from(operation: ServiceOperation) -> Self {
        match operation {
            ServiceOperation::Paginate | ServiceOperation::Search => Self::Index,
            ServiceOperation::Create => Self::Store,
            ServiceOperation::Read => Self::Show,
            ServiceOperation::Update => Self::Update,
            ServiceOperation::Delete => Self::Destroy,
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Entity already exists
    AlreadyExists,
    /// Request validation failed
    ValidationFailed,
    /// Invalid request body or id
    BadRequest,
    /// Operation conflicts with current state
    Conflict,
    /// Internal server error
    InternalError,
    /// Service temporarily unavailable
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Conflict => write!(f, "conflict"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::Conflict => StatusCode::CONFLICT,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Upper-case code for the response body, e.g. `NOT_FOUND`
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Structured API error with action context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub action: ApiAction,
    pub kind: ApiErrorKind,
    /// Message returned to the client
    pub message: String,
    /// The type of entity involved (e.g., "User", "Order")
    pub entity_type: Option<String>,
    /// The id of the entity involved
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(action: ApiAction, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            action,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Opaque 500 for failures whose details stay in the logs
    pub fn internal(action: ApiAction) -> Self {
        Self::new(action, ApiErrorKind::InternalError, "An internal error occurred")
    }

    /// 500 for a response payload the serializer could not produce
    pub fn serialization(action: ApiAction, err: &crate::error::Error) -> Self {
        tracing::error!(action = %action, error = %err, "Response serialization failed");
        Self::internal(action)
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ApiAction) -> Self {
        self.action = action;
        self
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.action, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        tracing::error!(
            action = %self.action,
            kind = %self.kind,
            entity_type = ?self.entity_type,
            entity_id = ?self.entity_id,
            retriable = self.is_retriable(),
            "API error: {}", self.message
        );

        let response = ApiErrorResponse {
            error: self.message,
            code: self.kind.error_code(),
            status: status.as_u16(),
            action: Some(self.action.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let kind = match err.kind {
            ServiceErrorKind::NotFound => ApiErrorKind::NotFound,
            ServiceErrorKind::AlreadyExists => ApiErrorKind::AlreadyExists,
            ServiceErrorKind::ConstraintViolation => ApiErrorKind::Conflict,
            ServiceErrorKind::ValidationFailed => ApiErrorKind::ValidationFailed,
            ServiceErrorKind::BadRequest => ApiErrorKind::BadRequest,
            ServiceErrorKind::ConnectionFailed | ServiceErrorKind::Timeout => {
                ApiErrorKind::ServiceUnavailable
            }
            ServiceErrorKind::SerializationError | ServiceErrorKind::Other => {
                ApiErrorKind::InternalError
            }
        };

        // internal details stay in the service error
        let message = match kind {
            ApiErrorKind::ServiceUnavailable => "Service temporarily unavailable".to_string(),
            ApiErrorKind::InternalError => {
                tracing::error!(error = %err, "Service failure hidden from client");
                "An internal error occurred".to_string()
            }
            _ => err.message,
        };

        Self {
            action: err.operation.into(),
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiErrorKind::ValidationFailed.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiErrorKind::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiErrorKind::NotFound.error_code(), "NOT_FOUND");
        assert_eq!(ApiErrorKind::ServiceUnavailable.error_code(), "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_from_service_error_maps_kind_and_action() {
        let cases = [
            (
                ServiceError::already_exists("User", "a@b.c"),
                ApiErrorKind::AlreadyExists,
                ApiAction::Store,
            ),
            (
                ServiceError::constraint_violation(ServiceOperation::Delete, "fk"),
                ApiErrorKind::Conflict,
                ApiAction::Destroy,
            ),
            (
                ServiceError::validation_failed(ServiceOperation::Update, "name too long"),
                ApiErrorKind::ValidationFailed,
                ApiAction::Update,
            ),
            (
                ServiceError::timeout(ServiceOperation::Search, "slow"),
                ApiErrorKind::ServiceUnavailable,
                ApiAction::Index,
            ),
        ];
        for (service_error, kind, action) in cases {
            let error = ApiError::from(service_error);
            assert_eq!(error.kind, kind);
            assert_eq!(error.action, action);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = ApiError::from(ServiceError::new(
            ServiceOperation::Paginate,
            ServiceErrorKind::Other,
            "relation \"users\" does not exist",
        ));
        assert_eq!(error.kind, ApiErrorKind::InternalError);
        assert_eq!(error.message, "An internal error occurred");
    }

    #[test]
    fn test_serialization_failure_is_opaque_500() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::serialization(ApiAction::Show, &crate::error::Error::from(json_err));
        assert_eq!(err.kind, ApiErrorKind::InternalError);
        assert_eq!(err.action, ApiAction::Show);
        assert_eq!(err.kind.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
    }

    #[test]
    fn test_display() {
        let error = ApiError::new(ApiAction::Show, ApiErrorKind::NotFound, "Entity not found")
            .with_entity("User", "7");
        assert_eq!(
            error.to_string(),
            "API not_found error during show: Entity not found [User: 7]"
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::from(ServiceError::not_found("User", "7")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["status"], 404);
        assert_eq!(json["action"], "show");
        assert_eq!(json["entity_id"], "7");
    }
}
