//! Repository-side types shared by resolvers and services
//!
//! - [`Criteria`]: filters, ordering and pagination built from query input
//! - [`RepositoryMetadata`]: the permit set and primary-key fields of an entity
//! - [`ResourceId`]: the id addressed by a route, including composite ids

mod criteria;
mod metadata;

pub use criteria::{
    Criteria, FilterCondition, FilterOperator, FilterValue, OrderBy, OrderDirection, Pagination,
};
pub use metadata::{RepositoryMetadata, ResourceId, StaticMetadata};
