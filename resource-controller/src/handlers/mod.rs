//! REST resource controller: actions, routes and response shaping
//!
//! - **Actions**: [`ResourceActions`] provides `index / create / store / show /
//!   edit / update / destroy` as overridable default methods;
//!   [`ResourceController`] runs them over a service and a serializer
//! - **Routing**: [`resource_router`] mounts the actions on an axum [`Router`](axum::Router)
//! - **Responses**: [`Envelope`] (`{data, meta}`) with [`PaginationMeta`] from
//!   [`LengthAwarePaginator`] or a plain total
//! - **Errors**: [`ApiError`] with HTTP status mapping, converted from
//!   [`ServiceError`](crate::service::ServiceError)
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::Router;
//! use resource_controller::prelude::*;
//!
//! # async fn run() -> resource_controller::error::Result<()> {
//! let service = MemoryService::new("User", StaticMetadata::new(["id", "name", "email"], ["id"]));
//! let controller = ResourceController::new(service)
//!     .with_serializer(JsonSerializer::new().hide(["password"]));
//!
//! let app = Router::new().nest("/users", resource_router(controller));
//! Server::new(Config::default()).serve(app).await
//! # }
//! ```

mod error;
mod paginator;
mod response;
mod routes;
mod serializer;
mod traits;

pub use error::{ApiAction, ApiError, ApiErrorKind};
pub use paginator::{LengthAwarePaginator, PaginationMeta, RequestContext};
pub use response::{Envelope, IndexMeta};
pub use routes::resource_router;
pub use serializer::{JsonSerializer, Serializer};
pub use traits::{CreateBody, ResourceActions, ResourceController, UpdateBody};
