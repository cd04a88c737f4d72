//! The service collaborator behind a resource controller
//!
//! Async methods use RPITIT (Return Position Impl Trait In Traits), so no
//! `async_trait` boxing is involved.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ServiceResult;
use crate::repository::{Criteria, RepositoryMetadata, ResourceId};

/// One page of a filtered listing, as returned by [`ResourceService::paginate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total matching items across all pages
    pub total: u64,
    pub per_page: u64,
    /// 1-indexed page number
    pub current_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, per_page: u64, current_page: u64) -> Self {
        Self {
            items,
            total,
            per_page,
            current_page: current_page.max(1),
        }
    }
}

/// Unpaginated listing, as returned by [`ResourceService::search`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> SearchResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

/// Data access behind a resource controller
///
/// # Type Parameters
///
/// - `Entity`: what reads and writes return
/// - `Create` / `Update`: request bodies of `store` and `update`
/// - `Deleted`: what `delete` reports back (removed entities, a count, ...)
///
/// # Example
///
/// ```rust,ignore
/// use resource_controller::prelude::*;
///
/// struct UserService {
///     meta: StaticMetadata,
///     pool: PgPool,
/// }
///
/// impl ResourceService for UserService {
///     type Entity = User;
///     type Create = CreateUser;
///     type Update = UpdateUser;
///     type Deleted = u64;
///
///     fn repository(&self) -> &dyn RepositoryMetadata {
///         &self.meta
///     }
///
///     async fn paginate(&self, criteria: Criteria) -> ServiceResult<Page<User>> {
///         // translate criteria into a query
///         todo!()
///     }
///
///     // ... other methods
/// }
/// ```
pub trait ResourceService: Send + Sync {
    type Entity: Serialize + Send + Sync;
    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;
    type Deleted: Serialize + Send;

    /// Field-mapping metadata of the underlying repository
    fn repository(&self) -> &dyn RepositoryMetadata;

    /// One page of the entities matching `criteria`
    ///
    /// `criteria.pagination` is always set when this is called from the
    /// index action.
    fn paginate(
        &self,
        criteria: Criteria,
    ) -> impl Future<Output = ServiceResult<Page<Self::Entity>>> + Send;

    /// Every entity matching `criteria`, with the total count
    fn search(
        &self,
        criteria: Criteria,
    ) -> impl Future<Output = ServiceResult<SearchResult<Self::Entity>>> + Send;

    fn create(
        &self,
        body: Self::Create,
    ) -> impl Future<Output = ServiceResult<Self::Entity>> + Send;

    fn read(&self, id: &ResourceId) -> impl Future<Output = ServiceResult<Self::Entity>> + Send;

    fn update(
        &self,
        id: &ResourceId,
        body: Self::Update,
    ) -> impl Future<Output = ServiceResult<Self::Entity>> + Send;

    /// Remove the entity (or entities, for a composite id)
    fn delete(&self, id: &ResourceId)
        -> impl Future<Output = ServiceResult<Self::Deleted>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_floors_current_page() {
        let page: Page<u32> = Page::new(vec![], 0, 15, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_search_result_serializes() {
        let result = SearchResult::new(vec![1, 2], 2);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"items": [1, 2], "total": 2}));
    }
}
