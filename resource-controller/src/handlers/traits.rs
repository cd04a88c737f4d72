//! Resource controller actions
//!
//! Every action is a default method of [`ResourceActions`], so a concrete
//! controller only supplies its collaborators and overrides the actions it
//! wants to change.
//!
//! # Example
//!
//! ```rust,ignore
//! use resource_controller::prelude::*;
//!
//! struct UserController {
//!     inner: ResourceController<UserService>,
//! }
//!
//! impl ResourceActions for UserController {
//!     type Service = UserService;
//!     type Serializer = JsonSerializer;
//!
//!     fn service(&self) -> &UserService { self.inner.service() }
//!     fn serializer(&self) -> &JsonSerializer { self.inner.serializer() }
//!     fn settings(&self) -> &ResourceConfig { self.inner.settings() }
//!
//!     // a real form description instead of the placeholder
//!     async fn create(&self) -> Result<Envelope, ApiError> {
//!         Ok(Envelope::new(json!({"fields": ["name", "email"]})))
//!     }
//! }
//! ```

use std::future::Future;

use serde::Serialize;
use serde_json::json;

use super::error::{ApiAction, ApiError};
use super::paginator::{LengthAwarePaginator, RequestContext};
use super::response::{Envelope, IndexMeta};
use super::serializer::{JsonSerializer, Serializer};
use crate::config::ResourceConfig;
use crate::repository::ResourceId;
use crate::resolver::{resolve_criteria, PagerMode};
use crate::service::ResourceService;

/// Request body type of `store` for a controller
pub type CreateBody<C> = <<C as ResourceActions>::Service as ResourceService>::Create;

/// Request body type of `update` for a controller
pub type UpdateBody<C> = <<C as ResourceActions>::Service as ResourceService>::Update;

/// The REST resource actions, all overridable
pub trait ResourceActions: Send + Sync {
    type Service: ResourceService;
    type Serializer: Serializer;

    fn service(&self) -> &Self::Service;

    fn serializer(&self) -> &Self::Serializer;

    /// Query keys and paging limits
    fn settings(&self) -> &ResourceConfig;

    /// Filtered, ordered listing
    ///
    /// Paginates unless the request disables paging, in which case every
    /// matching entity is returned with `meta.total`.
    fn index(
        &self,
        context: RequestContext,
    ) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        async move {
            let permitted = self.service().repository().field_mappings();
            let (criteria, mode) = resolve_criteria(self.settings(), &context.query, permitted);

            match mode {
                PagerMode::Paginate => {
                    let page = self.service().paginate(criteria).await?;
                    let meta = LengthAwarePaginator::from_page(&page, context)
                        .with_page_key(self.settings().page_key.as_str())
                        .to_meta();
                    let data = serialize(self.serializer(), ApiAction::Index, &page.items)?;
                    Ok(Envelope::new(data).with_meta(meta))
                }
                PagerMode::Search => {
                    let result = self.service().search(criteria).await?;
                    let data = serialize(self.serializer(), ApiAction::Index, &result.items)?;
                    Ok(Envelope::new(data).with_meta(IndexMeta::total(result.total)))
                }
            }
        }
    }

    /// Placeholder for a creation form description
    fn create(&self) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        async move { Ok(Envelope::new(json!(["XXX"]))) }
    }

    fn store(
        &self,
        body: CreateBody<Self>,
    ) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        async move {
            let entity = self.service().create(body).await?;
            Ok(Envelope::new(serialize(self.serializer(), ApiAction::Store, &entity)?))
        }
    }

    fn show(&self, id: String) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        async move {
            let entity = self.service().read(&ResourceId::single(id)).await?;
            Ok(Envelope::new(serialize(self.serializer(), ApiAction::Show, &entity)?))
        }
    }

    /// Placeholder for an edit form description
    fn edit(&self, id: String) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        async move { Ok(Envelope::new(json!([format!("XXX: {}", id)]))) }
    }

    fn update(
        &self,
        id: String,
        body: UpdateBody<Self>,
    ) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        async move {
            let entity = self
                .service()
                .update(&ResourceId::single(id), body)
                .await?;
            Ok(Envelope::new(serialize(self.serializer(), ApiAction::Update, &entity)?))
        }
    }

    /// Delete one entity, or several when `id` is a `,`-separated list
    fn destroy(&self, id: String) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        async move {
            let id = ResourceId::for_delete(&id, self.service().repository().identifier());
            let deleted = self.service().delete(&id).await?;
            Ok(Envelope::new(serialize(self.serializer(), ApiAction::Destroy, &deleted)?))
        }
    }
}

fn serialize<Z, T>(serializer: &Z, action: ApiAction, value: &T) -> Result<serde_json::Value, ApiError>
where
    Z: Serializer,
    T: Serialize + ?Sized,
{
    serializer
        .to_array(value)
        .map_err(|e| ApiError::serialization(action, &e))
}

/// Controller running the default actions over a service and serializer
///
/// # Example
///
/// ```rust
/// use resource_controller::handlers::{JsonSerializer, ResourceController};
/// use resource_controller::repository::StaticMetadata;
/// use resource_controller::service::MemoryService;
///
/// let service = MemoryService::new("User", StaticMetadata::new(["id", "name"], ["id"]));
/// let controller = ResourceController::new(service)
///     .with_serializer(JsonSerializer::new().hide(["password"]));
/// assert_eq!(controller.settings().default_per_page, 15);
/// ```
#[derive(Debug, Clone)]
pub struct ResourceController<S, Z = JsonSerializer> {
    service: S,
    serializer: Z,
    settings: ResourceConfig,
}

impl<S: ResourceService> ResourceController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            serializer: JsonSerializer::new(),
            settings: ResourceConfig::default(),
        }
    }
}

impl<S: ResourceService, Z: Serializer> ResourceController<S, Z> {
    #[must_use]
    pub fn with_serializer<Y: Serializer>(self, serializer: Y) -> ResourceController<S, Y> {
        ResourceController {
            service: self.service,
            serializer,
            settings: self.settings,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ResourceConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn serializer(&self) -> &Z {
        &self.serializer
    }

    pub fn settings(&self) -> &ResourceConfig {
        &self.settings
    }
}

impl<S: ResourceService, Z: Serializer> ResourceActions for ResourceController<S, Z> {
    type Service = S;
    type Serializer = Z;

    fn service(&self) -> &S {
        &self.service
    }

    fn serializer(&self) -> &Z {
        &self.serializer
    }

    fn settings(&self) -> &ResourceConfig {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ApiErrorKind;
    use crate::repository::{Criteria, RepositoryMetadata, StaticMetadata};
    use crate::resolver::QueryInput;
    use crate::service::{
        MemoryService, Page, SearchResult, ServiceError, ServiceOperation, ServiceResult,
    };
    use serde_json::Value;
    use std::sync::Mutex;

    fn controller() -> ResourceController<MemoryService> {
        let service = MemoryService::new(
            "User",
            StaticMetadata::new(["id", "name", "age", "password"], ["id"]),
        );
        for (name, age) in [("Alice", 30), ("Bob", 25), ("Carol", 41)] {
            service
                .insert(json!({"name": name, "age": age, "password": "hunter2"}))
                .unwrap();
        }
        ResourceController::new(service)
    }

    fn context(query: &str) -> RequestContext {
        RequestContext::new("/users", QueryInput::parse(query))
    }

    #[tokio::test]
    async fn test_index_paginates_by_default() {
        let envelope = controller().index(context("per_page=2")).await.unwrap();

        assert_eq!(envelope.data.as_array().unwrap().len(), 2);
        let Some(IndexMeta::Paginated(meta)) = envelope.meta else {
            panic!("expected pagination meta");
        };
        assert_eq!(meta.total, 3);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.next_page_url.as_deref(), Some("/users?per_page=2&page=2"));
    }

    #[tokio::test]
    async fn test_index_out_of_range_page_reports_requested_page() {
        let envelope = controller()
            .index(context("page=18446744073709551615"))
            .await
            .unwrap();

        assert_eq!(envelope.data, json!([]));
        let Some(IndexMeta::Paginated(meta)) = envelope.meta else {
            panic!("expected pagination meta");
        };
        let last_addressable = u64::MAX / 15;
        assert_eq!(meta.current_page, last_addressable);
        assert_eq!(
            meta.prev_page_url,
            Some(format!("/users?page={}", last_addressable - 1))
        );
        assert_eq!(meta.from, None);
    }

    #[tokio::test]
    async fn test_index_search_mode_reports_total() {
        let envelope = controller()
            .index(context("paginate=false&age__gte=30&sort=-age"))
            .await
            .unwrap();

        assert_eq!(envelope.meta, Some(IndexMeta::total(2)));
        assert_eq!(envelope.data[0]["name"], "Carol");
        assert_eq!(envelope.data[1]["name"], "Alice");
    }

    #[tokio::test]
    async fn test_index_ignores_non_permitted_fields() {
        let envelope = controller()
            .index(context("paginate=0&role=admin&sort=role"))
            .await
            .unwrap();
        assert_eq!(envelope.meta, Some(IndexMeta::total(3)));
    }

    #[tokio::test]
    async fn test_serializer_hides_fields() {
        let controller = controller().with_serializer(JsonSerializer::new().hide(["password"]));
        let envelope = controller.show("1".to_string()).await.unwrap();
        assert_eq!(envelope.data, json!({"id": 1, "name": "Alice", "age": 30}));
        assert!(envelope.meta.is_none());
    }

    #[tokio::test]
    async fn test_placeholders() {
        let controller = controller();
        assert_eq!(controller.create().await.unwrap().data, json!(["XXX"]));
        assert_eq!(
            controller.edit("7".to_string()).await.unwrap().data,
            json!(["XXX: 7"])
        );
    }

    #[tokio::test]
    async fn test_store_update_destroy() {
        let controller = controller();

        let stored = controller.store(json!({"name": "Dave", "age": 19})).await.unwrap();
        assert_eq!(stored.data["id"], 4);

        let updated = controller
            .update("4".to_string(), json!({"age": 20}))
            .await
            .unwrap();
        assert_eq!(updated.data["age"], 20);

        let deleted = controller.destroy("4".to_string()).await.unwrap();
        assert_eq!(deleted.data[0]["name"], "Dave");
    }

    #[tokio::test]
    async fn test_show_missing_propagates_not_found() {
        let err = controller().show("99".to_string()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.action, ApiAction::Show);
    }

    /// Records the id each delete receives
    struct RecordingService {
        meta: StaticMetadata,
        deleted: Mutex<Vec<ResourceId>>,
    }

    impl ResourceService for RecordingService {
        type Entity = Value;
        type Create = Value;
        type Update = Value;
        type Deleted = bool;

        fn repository(&self) -> &dyn RepositoryMetadata {
            &self.meta
        }

        async fn paginate(&self, _criteria: Criteria) -> ServiceResult<Page<Value>> {
            Ok(Page::new(vec![], 0, 15, 1))
        }

        async fn search(&self, _criteria: Criteria) -> ServiceResult<SearchResult<Value>> {
            Ok(SearchResult::new(vec![], 0))
        }

        async fn create(&self, body: Value) -> ServiceResult<Value> {
            Ok(body)
        }

        async fn read(&self, id: &ResourceId) -> ServiceResult<Value> {
            Err(ServiceError::not_found("Pair", id.to_string()))
        }

        async fn update(&self, id: &ResourceId, _body: Value) -> ServiceResult<Value> {
            Err(ServiceError::not_found("Pair", id.to_string()).with_operation(ServiceOperation::Update))
        }

        async fn delete(&self, id: &ResourceId) -> ServiceResult<bool> {
            self.deleted.lock().unwrap().push(id.clone());
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_destroy_fans_composite_id_over_identifier() {
        let controller = ResourceController::new(RecordingService {
            meta: StaticMetadata::new(["a", "b"], ["a", "b"]),
            deleted: Mutex::new(vec![]),
        });

        let envelope = controller.destroy("1,2".to_string()).await.unwrap();
        assert_eq!(envelope.data, json!(true));

        let deleted = controller.service().deleted.lock().unwrap();
        assert_eq!(
            deleted[0],
            ResourceId::Composite(vec![
                ("a".to_string(), vec!["1".to_string(), "2".to_string()]),
                ("b".to_string(), vec!["1".to_string(), "2".to_string()]),
            ])
        );
    }

    #[tokio::test]
    async fn test_destroy_single_id_passes_through() {
        let controller = ResourceController::new(RecordingService {
            meta: StaticMetadata::new(["id"], ["id"]),
            deleted: Mutex::new(vec![]),
        });
        controller.destroy("9".to_string()).await.unwrap();
        assert_eq!(
            controller.service().deleted.lock().unwrap()[0],
            ResourceId::single("9")
        );
    }

    /// Overrides a single action, keeping the rest
    struct FormController(ResourceController<MemoryService>);

    impl ResourceActions for FormController {
        type Service = MemoryService;
        type Serializer = JsonSerializer;

        fn service(&self) -> &MemoryService {
            self.0.service()
        }

        fn serializer(&self) -> &JsonSerializer {
            self.0.serializer()
        }

        fn settings(&self) -> &ResourceConfig {
            self.0.settings()
        }

        async fn create(&self) -> Result<Envelope, ApiError> {
            Ok(Envelope::new(json!({"fields": ["name", "age"]})))
        }
    }

    #[tokio::test]
    async fn test_overridden_action() {
        let controller = FormController(controller());
        assert_eq!(
            controller.create().await.unwrap().data,
            json!({"fields": ["name", "age"]})
        );
        assert_eq!(controller.show("2".to_string()).await.unwrap().data["name"], "Bob");
    }
}
