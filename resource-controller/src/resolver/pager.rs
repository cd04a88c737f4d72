//! Page/size input → pagination criteria, or search mode

use super::input::{is_falsy, QueryInput};
use crate::config::ResourceConfig;
use crate::repository::{Criteria, Pagination};

/// How the index action lists entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerMode {
    /// Criteria carry a page window; call `paginate`
    Paginate,
    /// Pagination explicitly disabled; call `search`
    Search,
}

/// Translates page and per-page parameters into pagination criteria
///
/// # Example
///
/// ```rust
/// use resource_controller::config::ResourceConfig;
/// use resource_controller::repository::{Criteria, Pagination};
/// use resource_controller::resolver::{PagerMode, PagerResolver, QueryInput};
///
/// let config = ResourceConfig::default();
/// let mut criteria = Criteria::new();
///
/// let mode = PagerResolver::new(&config).resolve(&QueryInput::parse("page=3&per_page=10"), &mut criteria);
/// assert_eq!(mode, PagerMode::Paginate);
/// assert_eq!(criteria.pagination, Some(Pagination::page(3, 10)));
///
/// let mut criteria = Criteria::new();
/// let mode = PagerResolver::new(&config).resolve(&QueryInput::parse("paginate=false"), &mut criteria);
/// assert_eq!(mode, PagerMode::Search);
/// assert!(criteria.pagination.is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PagerResolver<'a> {
    config: &'a ResourceConfig,
}

impl<'a> PagerResolver<'a> {
    pub fn new(config: &'a ResourceConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn resolve(&self, input: &QueryInput, criteria: &mut Criteria) -> PagerMode {
        if input.last(&self.config.paginate_key).is_some_and(is_falsy) {
            return PagerMode::Search;
        }

        let max = self.config.max_per_page.max(1);
        let per_page = parse_number(input.last(&self.config.per_page_key))
            .unwrap_or(self.config.default_per_page as i128)
            .clamp(1, max as i128);
        // the last page whose offset still fits in u64
        let last_addressable = i128::from(u64::MAX) / per_page;
        let page = parse_number(input.last(&self.config.page_key))
            .unwrap_or(1)
            .clamp(1, last_addressable);

        criteria.set_pagination(Pagination::page(
            u64::try_from(page).unwrap_or(1),
            u64::try_from(per_page).unwrap_or(max),
        ));
        PagerMode::Paginate
    }
}

fn parse_number(value: Option<&str>) -> Option<i128> {
    value.and_then(|v| v.trim().parse::<i128>().ok())
}
