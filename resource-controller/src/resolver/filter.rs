//! Query input → filter conditions
//!
//! A key is either a permitted field name (`status=active`) or a permitted
//! field name followed by the operator separator and an operator token
//! (`age__gte=18`). Everything else is dropped without error.
//!
//! | token                     | condition                                |
//! |---------------------------|------------------------------------------|
//! | *(none)*, `eq`            | `=`                                      |
//! | `ne`, `neq`               | `!=`                                     |
//! | `gt`, `gte`, `lt`, `lte`  | `>`, `>=`, `<`, `<=`                     |
//! | `like`                    | `LIKE`, value used as the pattern        |
//! | `contains`                | `LIKE %value%`                           |
//! | `startswith`, `endswith`  | `LIKE value%`, `LIKE %value`             |
//! | `in`, `notin`             | `IN` / `NOT IN`, value split on `,`      |
//! | `null`, `isnull`          | `IS NULL`, or `IS NOT NULL` when falsy   |
//! | `notnull`                 | `IS NOT NULL`, or `IS NULL` when falsy   |

use super::input::{is_falsy, QueryInput};
use crate::config::ResourceConfig;
use crate::repository::{Criteria, FilterCondition, FilterOperator, FilterValue};

/// Operator named by the suffix of a filter key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperatorToken {
    Compare(FilterOperator),
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
    Null,
    NotNull,
}

impl OperatorToken {
    fn parse(token: &str) -> Option<Self> {
        let parsed = match token {
            "eq" => Self::Compare(FilterOperator::Equal),
            "ne" | "neq" => Self::Compare(FilterOperator::NotEqual),
            "gt" => Self::Compare(FilterOperator::GreaterThan),
            "gte" => Self::Compare(FilterOperator::GreaterThanOrEqual),
            "lt" => Self::Compare(FilterOperator::LessThan),
            "lte" => Self::Compare(FilterOperator::LessThanOrEqual),
            "like" => Self::Compare(FilterOperator::Like),
            "contains" => Self::Contains,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "in" => Self::In,
            "notin" => Self::NotIn,
            "null" | "isnull" => Self::Null,
            "notnull" => Self::NotNull,
            _ => return None,
        };
        Some(parsed)
    }

    fn condition(self, field: &str, value: &str) -> Option<FilterCondition> {
        let blank = value.trim().is_empty();
        let condition = match self {
            Self::Null if is_falsy(value) => FilterCondition::is_not_null(field),
            Self::Null => FilterCondition::is_null(field),
            Self::NotNull if is_falsy(value) => FilterCondition::is_null(field),
            Self::NotNull => FilterCondition::is_not_null(field),
            _ if blank => return None,
            Self::Compare(operator) => {
                FilterCondition::new(field, operator, FilterValue::String(value.to_string()))
            }
            Self::Contains => FilterCondition::like(field, format!("%{}%", value)),
            Self::StartsWith => FilterCondition::like(field, format!("{}%", value)),
            Self::EndsWith => FilterCondition::like(field, format!("%{}", value)),
            Self::In | Self::NotIn => {
                let items: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                if items.is_empty() {
                    return None;
                }
                if self == Self::In {
                    FilterCondition::in_list(field, items)
                } else {
                    FilterCondition::not_in_list(field, items)
                }
            }
        };
        Some(condition)
    }
}

/// Translates permitted query fields into filter conditions
///
/// # Example
///
/// ```rust
/// use resource_controller::config::ResourceConfig;
/// use resource_controller::repository::{Criteria, FilterOperator};
/// use resource_controller::resolver::{FilterResolver, QueryInput};
///
/// let config = ResourceConfig::default();
/// let permitted = vec!["age".to_string(), "status".to_string()];
/// let input = QueryInput::parse("age__gte=18&password=x&status=active&page=2");
///
/// let mut criteria = Criteria::new();
/// FilterResolver::new(&config).resolve(&input, &permitted, &mut criteria);
///
/// assert_eq!(criteria.filters.len(), 2);
/// assert_eq!(criteria.filters[0].operator, FilterOperator::GreaterThanOrEqual);
/// assert_eq!(criteria.filters[1].field, "status");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterResolver<'a> {
    config: &'a ResourceConfig,
}

impl<'a> FilterResolver<'a> {
    pub fn new(config: &'a ResourceConfig) -> Self {
        Self { config }
    }

    /// Append a condition for every usable `(key, value)` pair, in input order
    pub fn resolve(&self, input: &QueryInput, permitted: &[String], criteria: &mut Criteria) {
        for (key, value) in input.iter() {
            if self.config.is_control_key(key) {
                continue;
            }

            let Some((field, token)) = self.split_key(key, permitted) else {
                tracing::debug!(key, "Dropping filter on non-permitted field");
                continue;
            };

            let operator = match token {
                None => Some(OperatorToken::Compare(FilterOperator::Equal)),
                Some(token) => OperatorToken::parse(token),
            };
            match operator.and_then(|op| op.condition(field, value)) {
                Some(condition) => criteria.push_filter(condition),
                None => tracing::debug!(key, "Dropping filter with unknown operator or blank value"),
            }
        }
    }

    /// `(field, operator token)` for a key naming a permitted field
    fn split_key<'k>(
        &self,
        key: &'k str,
        permitted: &[String],
    ) -> Option<(&'k str, Option<&'k str>)> {
        if permitted.iter().any(|f| f == key) {
            return Some((key, None));
        }
        let (field, token) = key.rsplit_once(self.config.operator_separator.as_str())?;
        permitted
            .iter()
            .any(|f| f == field)
            .then_some((field, Some(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permitted() -> Vec<String> {
        ["id", "name", "age", "deleted_at", "status"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn resolve(query: &str) -> Criteria {
        let config = ResourceConfig::default();
        let mut criteria = Criteria::new();
        let input = QueryInput::parse(query);
        FilterResolver::new(&config).resolve(&input, &permitted(), &mut criteria);
        criteria
    }

    #[test]
    fn test_plain_field_is_equality() {
        let criteria = resolve("name=Alice");
        assert_eq!(criteria.filters, vec![FilterCondition::eq("name", "Alice")]);
    }

    #[test]
    fn test_non_permitted_fields_are_dropped() {
        let criteria = resolve("password=secret&password__eq=x&Name=Bob");
        assert!(criteria.filters.is_empty());
    }

    #[test]
    fn test_control_keys_are_not_filters() {
        let config = ResourceConfig::default();
        let permitted = vec!["page".to_string(), "sort".to_string()];
        let mut criteria = Criteria::new();
        FilterResolver::new(&config).resolve(
            &QueryInput::parse("page=2&sort=name&per_page=5&paginate=0"),
            &permitted,
            &mut criteria,
        );
        assert!(criteria.filters.is_empty());
    }

    #[test]
    fn test_multiple_operators_per_field() {
        let criteria = resolve("age__gte=18&age__lt=65");
        assert_eq!(
            criteria.filters,
            vec![FilterCondition::gte("age", "18"), FilterCondition::lt("age", "65")]
        );
    }

    #[test]
    fn test_unknown_operator_is_dropped() {
        let criteria = resolve("age__between=1,2&age__gt=3");
        assert_eq!(criteria.filters, vec![FilterCondition::gt("age", "3")]);
    }

    #[test]
    fn test_like_variants() {
        let criteria =
            resolve("name__contains=li&name__startswith=Al&name__endswith=ce&name__like=A_ice");
        let patterns: Vec<&FilterValue> = criteria.filters.iter().map(|f| &f.value).collect();
        assert_eq!(
            patterns,
            vec![
                &FilterValue::from("%li%"),
                &FilterValue::from("Al%"),
                &FilterValue::from("%ce"),
                &FilterValue::from("A_ice"),
            ]
        );
        assert!(criteria.filters.iter().all(|f| f.operator == FilterOperator::Like));
    }

    #[test]
    fn test_in_lists_drop_empty_items() {
        let criteria = resolve("status__in=active,,pending,&id__notin=3");
        assert_eq!(
            criteria.filters,
            vec![
                FilterCondition::in_list("status", vec!["active".into(), "pending".into()]),
                FilterCondition::not_in_list("id", vec!["3".into()]),
            ]
        );
    }

    #[test]
    fn test_null_checks_follow_truthiness() {
        let criteria = resolve(
            "deleted_at__null=1&deleted_at__isnull=false&name__notnull=&age__notnull=0",
        );
        assert_eq!(
            criteria.filters,
            vec![
                FilterCondition::is_null("deleted_at"),
                FilterCondition::is_not_null("deleted_at"),
                FilterCondition::is_not_null("name"),
                FilterCondition::is_null("age"),
            ]
        );
    }

    #[test]
    fn test_blank_values_are_dropped() {
        let criteria = resolve("name=&age__gte=%20&status__in=,");
        assert!(criteria.filters.is_empty());
    }

    #[test]
    fn test_repeated_keys_repeat_conditions() {
        let criteria = resolve("status__ne=banned&status__ne=deleted");
        assert_eq!(criteria.filters.len(), 2);
    }

    #[test]
    fn test_custom_separator() {
        let config = ResourceConfig {
            operator_separator: ":".to_string(),
            ..ResourceConfig::default()
        };
        let mut criteria = Criteria::new();
        FilterResolver::new(&config).resolve(
            &QueryInput::parse("age:gt=3&age__gt=4"),
            &permitted(),
            &mut criteria,
        );
        assert_eq!(criteria.filters, vec![FilterCondition::gt("age", "3")]);
    }

    #[test]
    fn test_field_name_containing_separator() {
        let config = ResourceConfig::default();
        let permitted = vec!["meta__size".to_string()];
        let mut criteria = Criteria::new();
        FilterResolver::new(&config).resolve(
            &QueryInput::parse("meta__size=4&meta__size__lt=9"),
            &permitted,
            &mut criteria,
        );
        assert_eq!(
            criteria.filters,
            vec![
                FilterCondition::eq("meta__size", "4"),
                FilterCondition::lt("meta__size", "9"),
            ]
        );
    }
}
