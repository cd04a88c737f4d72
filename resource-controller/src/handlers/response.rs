//! The `{data, meta}` response envelope
//!
//! # Example
//!
//! ```rust
//! use resource_controller::handlers::{Envelope, IndexMeta};
//! use serde_json::json;
//!
//! let single = Envelope::new(json!({"id": 1}));
//! assert_eq!(serde_json::to_value(&single).unwrap(), json!({"data": {"id": 1}}));
//!
//! let listing = Envelope::new(json!([])).with_meta(IndexMeta::total(0));
//! assert_eq!(
//!     serde_json::to_value(&listing).unwrap(),
//!     json!({"data": [], "meta": {"total": 0}})
//! );
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::paginator::PaginationMeta;

/// `meta` block of an index response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexMeta {
    /// Length-aware pagination metadata
    Paginated(PaginationMeta),
    /// Unpaginated listing
    Total { total: u64 },
}

impl IndexMeta {
    pub fn total(total: u64) -> Self {
        Self::Total { total }
    }
}

impl From<PaginationMeta> for IndexMeta {
    fn from(meta: PaginationMeta) -> Self {
        Self::Paginated(meta)
    }
}

/// Response envelope; single-entity actions leave `meta` out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Serialized entity or list
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<IndexMeta>,
}

impl Envelope {
    pub fn new(data: Value) -> Self {
        Self { data, meta: None }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: impl Into<IndexMeta>) -> Self {
        self.meta = Some(meta.into());
        self
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{LengthAwarePaginator, RequestContext};
    use crate::resolver::QueryInput;
    use serde_json::json;

    #[test]
    fn test_paginated_meta_shape() {
        let meta = LengthAwarePaginator::new(3, 2, 1, 2, RequestContext::new("/r", QueryInput::new()))
            .to_meta();
        let envelope = Envelope::new(json!([{"id": 1}, {"id": 2}])).with_meta(meta);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json["meta"],
            json!({
                "current_page": 1,
                "first_page_url": "/r?page=1",
                "from": 1,
                "last_page": 2,
                "last_page_url": "/r?page=2",
                "next_page_url": "/r?page=2",
                "path": "/r",
                "per_page": 2,
                "prev_page_url": null,
                "to": 2,
                "total": 3
            })
        );
    }

    #[tokio::test]
    async fn test_into_response_is_ok_json() {
        let response = Envelope::new(json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
