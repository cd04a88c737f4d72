//! Resolution of untrusted query input into [`Criteria`]
//!
//! Each resolver is a stateless transformer over the request's
//! [`QueryInput`] and the repository's permit set. They run in sequence
//! (filters, then ordering, then paging) against a fresh [`Criteria`].
//! Malformed or non-permitted input is dropped, never reported as an error.

mod filter;
mod input;
mod order;
mod pager;

pub use filter::FilterResolver;
pub use input::{is_falsy, QueryInput};
pub use order::OrderResolver;
pub use pager::{PagerMode, PagerResolver};

use crate::config::ResourceConfig;
use crate::repository::Criteria;

/// Run all three resolvers against a fresh [`Criteria`]
///
/// # Example
///
/// ```rust
/// use resource_controller::config::ResourceConfig;
/// use resource_controller::resolver::{resolve_criteria, PagerMode, QueryInput};
///
/// let permitted = vec!["name".to_string()];
/// let input = QueryInput::parse("name__contains=ali&sort=-name&page=2");
/// let (criteria, mode) = resolve_criteria(&ResourceConfig::default(), &input, &permitted);
///
/// assert_eq!(mode, PagerMode::Paginate);
/// assert_eq!(criteria.filters.len(), 1);
/// assert_eq!(criteria.order.len(), 1);
/// assert_eq!(criteria.pagination.map(|p| p.offset), Some(15));
/// ```
pub fn resolve_criteria(
    config: &ResourceConfig,
    input: &QueryInput,
    permitted: &[String],
) -> (Criteria, PagerMode) {
    let mut criteria = Criteria::new();
    FilterResolver::new(config).resolve(input, permitted, &mut criteria);
    OrderResolver::new(config).resolve(input, permitted, &mut criteria);
    let mode = PagerResolver::new(config).resolve(input, &mut criteria);

    tracing::debug!(criteria = ?criteria, mode = ?mode, "Resolved query criteria");
    (criteria, mode)
}
