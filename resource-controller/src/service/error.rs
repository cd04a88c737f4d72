//! Service error types
//!
//! Services report failures as a structured [`ServiceError`]. The controller
//! never inspects them; they travel through the actions unchanged and become
//! HTTP responses through [`ApiError`](crate::handlers::ApiError).
//!
//! # Example
//!
//! ```rust
//! use resource_controller::service::{ServiceError, ServiceErrorKind};
//!
//! let error = ServiceError::not_found("User", "usr_123");
//! assert!(matches!(error.kind, ServiceErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Service call that was running when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOperation {
    /// One page of a filtered listing
    Paginate,
    /// Unpaginated filtered listing
    Search,
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for ServiceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paginate => write!(f, "paginate"),
            Self::Search => write!(f, "search"),
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of service error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceErrorKind {
    /// Entity was not found
    NotFound,
    /// Entity already exists (duplicate key)
    AlreadyExists,
    /// Storage constraint violation
    ConstraintViolation,
    /// Input rejected before reaching storage
    ValidationFailed,
    /// Request body or id could not be interpreted
    BadRequest,
    /// Backing store unreachable
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Serialization or deserialization error
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured service error with operation and entity context
///
/// # Example
///
/// ```rust
/// use resource_controller::service::{ServiceError, ServiceOperation};
///
/// let error = ServiceError::not_found("Order", "ord_1").with_operation(ServiceOperation::Update);
/// assert_eq!(
///     error.to_string(),
///     "Service not_found error during update: Entity not found [Order: ord_1]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub operation: ServiceOperation,
    pub kind: ServiceErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g., "User", "Order")
    pub entity_type: Option<String>,
    /// The id of the entity involved
    pub entity_id: Option<String>,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn new(
        operation: ServiceOperation,
        kind: ServiceErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// "Not found" error with entity context, reported against `read`
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(
            ServiceOperation::Read,
            ServiceErrorKind::NotFound,
            "Entity not found",
        )
        .with_entity(entity_type, entity_id)
    }

    /// "Already exists" error with entity context, reported against `create`
    pub fn already_exists(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::new(
            ServiceOperation::Create,
            ServiceErrorKind::AlreadyExists,
            "Entity already exists",
        )
        .with_entity(entity_type, identifier)
    }

    pub fn validation_failed(operation: ServiceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ServiceErrorKind::ValidationFailed, message)
    }

    pub fn bad_request(operation: ServiceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ServiceErrorKind::BadRequest, message)
    }

    pub fn constraint_violation(operation: ServiceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ServiceErrorKind::ConstraintViolation, message)
    }

    pub fn connection_failed(operation: ServiceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ServiceErrorKind::ConnectionFailed, message)
    }

    pub fn timeout(operation: ServiceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ServiceErrorKind::Timeout, message)
    }

    pub fn serialization_error(operation: ServiceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ServiceErrorKind::SerializationError, message)
    }

    /// Add entity context to an existing error
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
    pub fn with_operation(mut self, operation: ServiceOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Transient errors that may succeed on retry
    ///
    /// ```rust
    /// use resource_controller::service::{ServiceError, ServiceOperation};
    ///
    /// assert!(ServiceError::timeout(ServiceOperation::Search, "slow").is_retriable());
    /// assert!(!ServiceError::not_found("User", "1").is_retriable());
    /// ```
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            ServiceErrorKind::ConnectionFailed | ServiceErrorKind::Timeout
        )
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Service {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_data() || err.is_syntax() || err.is_eof() {
            ServiceErrorKind::BadRequest
        } else {
            ServiceErrorKind::SerializationError
        };
        Self::new(ServiceOperation::Create, kind, err.to_string())
    }
}
