//! Axum routes for a resource controller
//!
//! | method        | path          | action    |
//! |---------------|---------------|-----------|
//! | `GET`         | `/`           | `index`   |
//! | `GET`         | `/create`     | `create`  |
//! | `POST`        | `/`           | `store`   |
//! | `GET`         | `/{id}`       | `show`    |
//! | `GET`         | `/{id}/edit`  | `edit`    |
//! | `PUT`/`PATCH` | `/{id}`       | `update`  |
//! | `DELETE`      | `/{id}`       | `destroy` |

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    routing::get,
    Json, Router,
};

use super::error::{ApiAction, ApiError, ApiErrorKind};
use super::paginator::RequestContext;
use super::response::Envelope;
use super::traits::{CreateBody, ResourceActions, UpdateBody};

/// Router exposing the resource actions of `controller`
///
/// Mount it under the resource's prefix with [`Router::nest`].
///
/// # Example
///
/// ```rust
/// use axum::Router;
/// use resource_controller::handlers::{resource_router, ResourceController};
/// use resource_controller::repository::StaticMetadata;
/// use resource_controller::service::MemoryService;
///
/// let users = MemoryService::new("User", StaticMetadata::new(["id", "name"], ["id"]));
/// let app: Router = Router::new().nest("/users", resource_router(ResourceController::new(users)));
/// ```
pub fn resource_router<C>(controller: C) -> Router
where
    C: ResourceActions + 'static,
{
    Router::new()
        .route("/", get(index::<C>).post(store::<C>))
        .route("/create", get(create::<C>))
        .route(
            "/{id}",
            get(show::<C>)
                .put(update::<C>)
                .patch(update::<C>)
                .delete(destroy::<C>),
        )
        .route("/{id}/edit", get(edit::<C>))
        .with_state(Arc::new(controller))
}

fn body_rejected(action: ApiAction, rejection: JsonRejection) -> ApiError {
    ApiError::new(action, ApiErrorKind::BadRequest, rejection.body_text())
}

async fn index<C: ResourceActions>(
    State(controller): State<Arc<C>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Envelope, ApiError> {
    controller.index(RequestContext::from_uri(&uri)).await
}

async fn create<C: ResourceActions>(
    State(controller): State<Arc<C>>,
) -> Result<Envelope, ApiError> {
    controller.create().await
}

async fn store<C: ResourceActions>(
    State(controller): State<Arc<C>>,
    body: Result<Json<CreateBody<C>>, JsonRejection>,
) -> Result<Envelope, ApiError> {
    let Json(body) = body.map_err(|e| body_rejected(ApiAction::Store, e))?;
    controller.store(body).await
}

async fn show<C: ResourceActions>(
    State(controller): State<Arc<C>>,
    Path(id): Path<String>,
) -> Result<Envelope, ApiError> {
    controller.show(id).await
}

async fn edit<C: ResourceActions>(
    State(controller): State<Arc<C>>,
    Path(id): Path<String>,
) -> Result<Envelope, ApiError> {
    controller.edit(id).await
}

async fn update<C: ResourceActions>(
    State(controller): State<Arc<C>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateBody<C>>, JsonRejection>,
) -> Result<Envelope, ApiError> {
    let Json(body) = body.map_err(|e| body_rejected(ApiAction::Update, e))?;
    controller.update(id, body).await
}

async fn destroy<C: ResourceActions>(
    State(controller): State<Arc<C>>,
    Path(id): Path<String>,
) -> Result<Envelope, ApiError> {
    controller.destroy(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ResourceController;
    use crate::repository::StaticMetadata;
    use crate::service::MemoryService;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let service = MemoryService::new(
            "Book",
            StaticMetadata::new(["id", "title", "year"], ["id"]),
        );
        for (title, year) in [("Dune", 1965), ("Neuromancer", 1984), ("Hyperion", 1989)] {
            service.insert(json!({"title": title, "year": year})).unwrap();
        }
        Router::new().nest("/books", resource_router(ResourceController::new(service)))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_index_route() {
        let (status, json) = send(app(), Method::GET, "/books?year__gt=1970&per_page=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["title"], "Neuromancer");
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["meta"]["path"], "/books");
        assert_eq!(
            json["meta"]["next_page_url"],
            "/books?year__gt=1970&per_page=1&page=2"
        );
    }

    #[tokio::test]
    async fn test_index_route_search_mode() {
        let (status, json) = send(app(), Method::GET, "/books?paginate=off", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"], json!({"total": 3}));
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_route_wins_over_show() {
        let (status, json) = send(app(), Method::GET, "/books/create", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"data": ["XXX"]}));
    }

    #[tokio::test]
    async fn test_edit_route() {
        let (_, json) = send(app(), Method::GET, "/books/2/edit", None).await;
        assert_eq!(json, json!({"data": ["XXX: 2"]}));
    }

    #[tokio::test]
    async fn test_store_route() {
        let (status, json) = send(
            app(),
            Method::POST,
            "/books",
            Some(json!({"title": "Solaris", "year": 1961})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], 4);
        assert!(json.get("meta").is_none());
    }

    #[tokio::test]
    async fn test_store_route_rejects_malformed_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/books")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_show_route() {
        let (status, json) = send(app(), Method::GET, "/books/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "Dune");

        let (status, json) = send(app(), Method::GET, "/books/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_routes() {
        for method in [Method::PUT, Method::PATCH] {
            let (status, json) = send(app(), method, "/books/3", Some(json!({"year": 1990}))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["data"]["year"], 1990);
            assert_eq!(json["data"]["title"], "Hyperion");
        }
    }

    #[tokio::test]
    async fn test_destroy_route_with_composite_id() {
        let (status, json) = send(app(), Method::DELETE, "/books/1,3", None).await;
        assert_eq!(status, StatusCode::OK);

        let mut titles: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|b| b["title"].as_str())
            .collect();
        titles.sort_unstable();
        assert_eq!(titles, vec!["Dune", "Hyperion"]);
    }
}
