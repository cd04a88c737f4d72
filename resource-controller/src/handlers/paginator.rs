//! Length-aware pagination metadata
//!
//! Builds the `meta` block of a paginated index response: page counters,
//! item range and navigation URLs that keep every query parameter of the
//! current request.

use serde::{Deserialize, Serialize};

use crate::resolver::QueryInput;
use crate::service::Page;

/// Path and decoded query of the request being answered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub query: QueryInput,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, query: QueryInput) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    /// Build from a request URI
    pub fn from_uri(uri: &axum::http::Uri) -> Self {
        Self::new(
            uri.path(),
            uri.query().map(QueryInput::parse).unwrap_or_default(),
        )
    }
}

/// Pagination metadata of an index response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u64,
    pub first_page_url: String,
    /// 1-indexed position of the first item on this page
    pub from: Option<u64>,
    pub last_page: u64,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub path: String,
    pub per_page: u64,
    pub prev_page_url: Option<String>,
    /// 1-indexed position of the last item on this page
    pub to: Option<u64>,
    pub total: u64,
}

/// Paginator over one page of a listing, aware of the total count
///
/// # Example
///
/// ```rust
/// use resource_controller::handlers::{LengthAwarePaginator, RequestContext};
/// use resource_controller::resolver::QueryInput;
///
/// let context = RequestContext::new("/users", QueryInput::parse("status=active&page=2"));
/// let paginator = LengthAwarePaginator::new(47, 15, 2, 15, context);
/// let meta = paginator.to_meta();
///
/// assert_eq!(meta.last_page, 4);
/// assert_eq!((meta.from, meta.to), (Some(16), Some(30)));
/// assert_eq!(meta.next_page_url.as_deref(), Some("/users?status=active&page=3"));
/// assert_eq!(meta.prev_page_url.as_deref(), Some("/users?status=active&page=1"));
/// ```
#[derive(Debug, Clone)]
pub struct LengthAwarePaginator {
    total: u64,
    per_page: u64,
    current_page: u64,
    count: u64,
    context: RequestContext,
    page_key: String,
}

impl LengthAwarePaginator {
    /// `count` is the number of items actually on the current page
    pub fn new(
        total: u64,
        per_page: u64,
        current_page: u64,
        count: u64,
        context: RequestContext,
    ) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            count,
            context,
            page_key: "page".to_string(),
        }
    }

    pub fn from_page<T>(page: &Page<T>, context: RequestContext) -> Self {
        Self::new(
            page.total,
            page.per_page,
            page.current_page,
            page.items.len() as u64,
            context,
        )
    }

    /// Query key that carries the page number in generated URLs
    #[must_use]
    pub fn with_page_key(mut self, key: impl Into<String>) -> Self {
        self.page_key = key.into();
        self
    }

    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Request path without a trailing `/`, except for the root path
    pub fn path(&self) -> String {
        let trimmed = self.context.path.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// URL of `page`, keeping the current query parameters
    pub fn url(&self, page: u64) -> String {
        let query = self
            .context
            .query
            .with_value(&self.page_key, page.max(1).to_string())
            .to_query_string();
        format!("{}?{}", self.path(), query)
    }

    pub fn to_meta(&self) -> PaginationMeta {
        let last_page = self.last_page();
        let (from, to) = if self.count == 0 {
            (None, None)
        } else {
            let from = self
                .current_page
                .saturating_sub(1)
                .saturating_mul(self.per_page)
                .saturating_add(1);
            (Some(from), Some(from.saturating_add(self.count - 1)))
        };

        PaginationMeta {
            current_page: self.current_page,
            first_page_url: self.url(1),
            from,
            last_page,
            last_page_url: self.url(last_page),
            next_page_url: (self.current_page < last_page).then(|| self.url(self.current_page + 1)),
            path: self.path(),
            per_page: self.per_page,
            prev_page_url: (self.current_page > 1).then(|| self.url(self.current_page - 1)),
            to,
            total: self.total,
        }
    }
}
