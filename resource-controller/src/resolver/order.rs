//! `sort` parameter → ordering terms

use super::input::QueryInput;
use crate::config::ResourceConfig;
use crate::repository::{Criteria, OrderDirection};

/// Translates `sort=-created_at,name` into ordering criteria
///
/// Tokens are `field`, `+field` (ascending) or `-field` (descending).
/// Non-permitted fields and blank tokens are skipped, and a field already
/// ordered keeps its first direction.
///
/// # Example
///
/// ```rust
/// use resource_controller::config::ResourceConfig;
/// use resource_controller::repository::{Criteria, OrderBy};
/// use resource_controller::resolver::{OrderResolver, QueryInput};
///
/// let config = ResourceConfig::default();
/// let permitted = vec!["name".to_string(), "created_at".to_string()];
/// let mut criteria = Criteria::new();
///
/// OrderResolver::new(&config).resolve(
///     &QueryInput::parse("sort=-created_at,secret,name"),
///     &permitted,
///     &mut criteria,
/// );
/// assert_eq!(criteria.order, vec![OrderBy::desc("created_at"), OrderBy::asc("name")]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OrderResolver<'a> {
    config: &'a ResourceConfig,
}

impl<'a> OrderResolver<'a> {
    pub fn new(config: &'a ResourceConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, input: &QueryInput, permitted: &[String], criteria: &mut Criteria) {
        let Some(sort) = input.last(&self.config.sort_key) else {
            return;
        };

        // `+` decodes to a space in form encoding, so trimming covers `+field`
        for token in sort.split(',').map(str::trim) {
            let (field, direction) = match token.strip_prefix('-') {
                Some(field) => (field.trim(), OrderDirection::Descending),
                None => (
                    token.strip_prefix('+').unwrap_or(token).trim(),
                    OrderDirection::Ascending,
                ),
            };

            if field.is_empty() {
                continue;
            }
            if !permitted.iter().any(|f| f == field) {
                tracing::debug!(field, "Dropping sort on non-permitted field");
                continue;
            }
            if criteria.is_ordered_by(field) {
                continue;
            }
            criteria.push_order(field, direction);
        }
    }
}
