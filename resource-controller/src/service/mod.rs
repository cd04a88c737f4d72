//! Service collaborators behind a resource controller
//!
//! - [`ResourceService`]: the async data-access contract the controller calls
//! - [`ServiceError`]: structured failures reported by a service
//! - [`MemoryService`]: a JSON-object service over a concurrent map

mod error;
mod memory;
mod traits;

pub use error::{ServiceError, ServiceErrorKind, ServiceOperation, ServiceResult};
pub use memory::MemoryService;
pub use traits::{Page, ResourceService, SearchResult};
