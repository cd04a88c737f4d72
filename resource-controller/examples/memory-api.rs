//! Books API Example - an in-memory resource behind the generic controller
//!
//! Run with: cargo run --example memory-api
//!
//! The service runs on port 8080 by default (configurable via RESOURCE_SERVICE__PORT env var)
//!
//! Test with:
//!   curl 'http://localhost:8080/books?year__gte=1980&sort=-year'
//!   curl 'http://localhost:8080/books?title__like=%25on%25&per_page=1&page=2'
//!   curl 'http://localhost:8080/books?paginate=false'
//!   curl http://localhost:8080/books/1
//!   curl -X POST -H 'content-type: application/json' \
//!        -d '{"title":"Solaris","year":1961}' http://localhost:8080/books
//!   curl -X PATCH -H 'content-type: application/json' \
//!        -d '{"year":1966}' http://localhost:8080/books/1
//!   curl -X DELETE http://localhost:8080/books/2,3

use resource_controller::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_for_service("memory-api")?;
    init_tracing(&config)?;

    let books = MemoryService::new(
        "Book",
        StaticMetadata::new(["id", "title", "author", "year"], ["id"]),
    );
    for (title, author, year) in [
        ("Dune", "Frank Herbert", 1965),
        ("Neuromancer", "William Gibson", 1984),
        ("Hyperion", "Dan Simmons", 1989),
        ("The Left Hand of Darkness", "Ursula K. Le Guin", 1969),
    ] {
        books
            .insert(json!({"title": title, "author": author, "year": year, "isbn": null}))
            .map_err(|e| Error::Internal(e.to_string()))?;
    }
    info!(count = books.len(), "Seeded books");

    let controller = ResourceController::new(books)
        .with_serializer(JsonSerializer::new().hide(["isbn"]))
        .with_settings(config.resource.clone());

    let app = Router::new().nest("/books", resource_router(controller));
    Server::new(config).serve(app).await
}
