//! Repository metadata and resource identifiers
//!
//! A repository describes which fields of its entity may be referenced by
//! query input (the permit set) and which fields form the primary key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field-mapping metadata of the entity behind a repository
///
/// # Example
///
/// ```rust
/// use resource_controller::repository::{RepositoryMetadata, StaticMetadata};
///
/// let meta = StaticMetadata::new(["id", "name", "email"], ["id"]);
/// assert!(meta.permits("name"));
/// assert!(!meta.permits("password"));
/// assert_eq!(meta.identifier(), ["id".to_string()]);
/// ```
pub trait RepositoryMetadata: Send + Sync {
    /// Field names exposed for filtering and ordering, in mapping order
    fn field_mappings(&self) -> &[String];

    /// Primary-key field names, in key order
    fn identifier(&self) -> &[String];

    /// Whether `field` is in the permit set
    fn permits(&self, field: &str) -> bool {
        self.field_mappings().iter().any(|f| f == field)
    }
}

/// Metadata declared up front rather than read from an ORM mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticMetadata {
    fields: Vec<String>,
    identifier: Vec<String>,
}

impl StaticMetadata {
    pub fn new<F, I>(fields: F, identifier: I) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            identifier: identifier.into_iter().map(Into::into).collect(),
        }
    }
}

impl RepositoryMetadata for StaticMetadata {
    fn field_mappings(&self) -> &[String] {
        &self.fields
    }

    fn identifier(&self) -> &[String] {
        &self.identifier
    }
}

/// Identifier of the resource(s) addressed by a route
///
/// # Example
///
/// ```rust
/// use resource_controller::repository::ResourceId;
///
/// let identifier = vec!["a".to_string(), "b".to_string()];
/// let id = ResourceId::for_delete("1,2", &identifier);
///
/// let ResourceId::Composite(fields) = id else { panic!("expected composite id") };
/// assert_eq!(fields, vec![
///     ("a".to_string(), vec!["1".to_string(), "2".to_string()]),
///     ("b".to_string(), vec!["1".to_string(), "2".to_string()]),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// A single route id, as given
    Single(String),
    /// Identifier field name → list of values, in identifier order
    Composite(Vec<(String, Vec<String>)>),
}

impl ResourceId {
    pub fn single(raw: impl Into<String>) -> Self {
        Self::Single(raw.into())
    }

    /// Build the id used by the destroy action
    ///
    /// A raw id containing `,` is split (empty segments kept) and the whole
    /// list is assigned to every identifier field.
    pub fn for_delete(raw: &str, identifier: &[String]) -> Self {
        if !raw.contains(',') {
            return Self::Single(raw.to_string());
        }

        let values: Vec<String> = raw.split(',').map(str::to_string).collect();
        Self::Composite(
            identifier
                .iter()
                .map(|field| (field.clone(), values.clone()))
                .collect(),
        )
    }

    /// Values listed for one identifier field of a composite id
    #[must_use]
    pub fn values_for(&self, field: &str) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Composite(fields) => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, values)| values.as_slice()),
        }
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(raw) => write!(f, "{}", raw),
            Self::Composite(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(name, values)| format!("{}=[{}]", name, values.join(",")))
                    .collect();
                write!(f, "{}", parts.join(";"))
            }
        }
    }
}

impl From<&str> for ResourceId {
    fn from(raw: &str) -> Self {
        Self::single(raw)
    }
}

impl From<String> for ResourceId {
    fn from(raw: String) -> Self {
        Self::Single(raw)
    }
}
