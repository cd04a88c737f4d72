//! Criteria accumulated from query input
//!
//! Resolvers append to a [`Criteria`] in sequence; the service consumes it
//! once to build its query.
//!
//! # Example
//!
//! ```rust
//! use resource_controller::repository::{Criteria, FilterCondition, OrderDirection, Pagination};
//!
//! let mut criteria = Criteria::new();
//! criteria.push_filter(FilterCondition::eq("status", "active"));
//! criteria.push_order("created_at", OrderDirection::Descending);
//! criteria.set_pagination(Pagination::page(2, 20));
//!
//! assert_eq!(criteria.filters.len(), 1);
//! assert_eq!(criteria.pagination.unwrap().offset, 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction for ordering results
///
/// # Example
///
/// ```rust
/// use resource_controller::repository::OrderDirection;
///
/// assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
/// assert_eq!(format!("{}", OrderDirection::Descending), "desc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    #[serde(rename = "desc")]
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl OrderDirection {
    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// A single `(field, direction)` ordering term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to order on
    pub field: String,
    /// Direction of the ordering
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Descending)
    }
}

/// Offset/limit window over a result set
///
/// # Example
///
/// ```rust
/// use resource_controller::repository::Pagination;
///
/// let page3 = Pagination::page(3, 20);
/// assert_eq!(page3.offset, 40);
/// assert_eq!(page3.limit, 20);
/// assert_eq!(page3.current_page(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create pagination from a raw offset and limit
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create pagination for a 1-indexed page number
    ///
    /// Page 0 is treated as page 1.
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }

    /// The 1-indexed page this window starts on
    #[must_use]
    pub const fn current_page(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        self.offset / self.limit + 1
    }

    /// Items per page
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.limit
    }
}

/// Comparison operators for filter conditions
///
/// # Example
///
/// ```rust
/// use resource_controller::repository::FilterOperator;
///
/// assert_eq!(format!("{}", FilterOperator::GreaterThanOrEqual), ">=");
/// assert_eq!(format!("{}", FilterOperator::NotIn), "NOT IN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Not equal to (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Pattern matching (LIKE)
    Like,
    /// Value is in a list (IN)
    In,
    /// Value is not in a list (NOT IN)
    NotIn,
    /// Value is null (IS NULL)
    IsNull,
    /// Value is not null (IS NOT NULL)
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
            Self::In => write!(f, "IN"),
            Self::NotIn => write!(f, "NOT IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// Value side of a filter condition
///
/// Query input is untyped, so values stay strings; the service decides how
/// to compare them against its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Single string value
    String(String),
    /// List of string values (for IN / NOT IN)
    List(Vec<String>),
    /// No value (for IS NULL / IS NOT NULL)
    Null,
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::List(list)
    }
}

/// A single `(field, operator, value)` filter condition
///
/// # Example
///
/// ```rust
/// use resource_controller::repository::{FilterCondition, FilterOperator};
///
/// let filter = FilterCondition::gte("age", "18");
/// assert_eq!(filter.field, "age");
/// assert_eq!(filter.operator, FilterOperator::GreaterThanOrEqual);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// field = value
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// field != value
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value.into())
    }

    /// field > value
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value.into())
    }

    /// field >= value
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// field < value
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    /// field <= value
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// field LIKE pattern
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, FilterValue::String(pattern.into()))
    }

    /// field IN (values)
    pub fn in_list(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::List(values))
    }

    /// field NOT IN (values)
    pub fn not_in_list(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOperator::NotIn, FilterValue::List(values))
    }

    /// field IS NULL
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, FilterValue::Null)
    }

    /// field IS NOT NULL
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, FilterValue::Null)
    }
}

/// Filter, order and pagination parameters passed to a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// AND-combined filter conditions, in input order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterCondition>,
    /// Ordering terms, highest precedence first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<OrderBy>,
    /// Result window; `None` means "all matching items"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl Criteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_filter(&mut self, condition: FilterCondition) {
        self.filters.push(condition);
    }

    pub fn push_order(&mut self, field: impl Into<String>, direction: OrderDirection) {
        self.order.push(OrderBy::new(field, direction));
    }

    pub fn set_pagination(&mut self, pagination: Pagination) {
        self.pagination = Some(pagination);
    }

    /// Whether a field already has an ordering term
    #[must_use]
    pub fn is_ordered_by(&self, field: &str) -> bool {
        self.order.iter().any(|o| o.field == field)
    }

    /// Fields referenced by filters or ordering, in first-seen order
    #[must_use]
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        let names = self
            .filters
            .iter()
            .map(|f| f.field.as_str())
            .chain(self.order.iter().map(|o| o.field.as_str()));
        for name in names {
            if !fields.contains(&name) {
                fields.push(name);
            }
        }
        fields
    }

    /// True when no filter, order or pagination has been set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.order.is_empty() && self.pagination.is_none()
    }
}
