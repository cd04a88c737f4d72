//! # resource-controller
//!
//! Generic REST resource controller for axum: `index / create / store / show /
//! edit / update / destroy` actions over an injected service, with filtering,
//! ordering and pagination driven by the query string and a `{data, meta}`
//! response envelope.
//!
//! ## Features
//!
//! - **Query resolution**: permitted-field filters with operator suffixes
//!   (`age__gte=18`), `sort=-created_at,name`, `page` / `per_page`, and
//!   `paginate=false` for unpaginated listings
//! - **Overridable actions**: every action is a default trait method
//! - **Length-aware pagination metadata** with navigation URLs that keep the
//!   request's query parameters
//! - **Composite ids**: `DELETE /{a},{b}` addresses several entities at once
//! - **Structured errors** mapped to HTTP status codes
//!
//! ## Example
//!
//! ```rust,no_run
//! use resource_controller::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let books = MemoryService::new("Book", StaticMetadata::new(["id", "title", "year"], ["id"]));
//!     let controller = ResourceController::new(books).with_settings(config.resource.clone());
//!
//!     let app = Router::new().nest("/books", resource_router(controller));
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod repository;
pub mod resolver;
pub mod server;
pub mod service;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, ResourceConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::observability::init_tracing;
    pub use crate::server::Server;

    pub use crate::handlers::{
        resource_router, ApiAction, ApiError, ApiErrorKind, Envelope, IndexMeta, JsonSerializer,
        LengthAwarePaginator, PaginationMeta, RequestContext, ResourceActions, ResourceController,
        Serializer,
    };
    pub use crate::repository::{
        Criteria, FilterCondition, FilterOperator, FilterValue, OrderBy, OrderDirection,
        Pagination, RepositoryMetadata, ResourceId, StaticMetadata,
    };
    pub use crate::resolver::{
        resolve_criteria, FilterResolver, OrderResolver, PagerMode, PagerResolver, QueryInput,
    };
    pub use crate::service::{
        MemoryService, Page, ResourceService, SearchResult, ServiceError, ServiceErrorKind,
        ServiceOperation, ServiceResult,
    };

    pub use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Json, Response},
        routing::{delete, get, patch, post, put},
        Router,
    };

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, instrument, trace, warn};

    pub use tokio;
}
