//! In-memory [`ResourceService`] over JSON objects
//!
//! Entities are stored in a [`DashMap`] keyed by their identifier value(s).
//! Criteria are evaluated in process: comparison filters compare numerically
//! when both sides are numbers and as text otherwise, `LIKE` supports the `%`
//! and `_` wildcards (case-insensitive), and comparisons against a missing or
//! null field never match.
//!
//! # Example
//!
//! ```rust
//! use resource_controller::repository::StaticMetadata;
//! use resource_controller::service::MemoryService;
//! use serde_json::json;
//!
//! let service = MemoryService::new("User", StaticMetadata::new(["id", "name"], ["id"]));
//! let alice = service.insert(json!({"name": "Alice"})).unwrap();
//! assert_eq!(alice["id"], 1);
//! assert_eq!(service.len(), 1);
//! ```

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::{Map, Value};

use super::error::{ServiceError, ServiceOperation, ServiceResult};
use super::traits::{Page, ResourceService, SearchResult};
use crate::repository::{
    Criteria, FilterCondition, FilterOperator, FilterValue, OrderDirection, RepositoryMetadata,
    ResourceId, StaticMetadata,
};

pub struct MemoryService {
    entity_type: String,
    metadata: StaticMetadata,
    entities: DashMap<String, Value>,
    next_id: AtomicU64,
}

impl MemoryService {
    pub fn new(entity_type: impl Into<String>, metadata: StaticMetadata) -> Self {
        Self {
            entity_type: entity_type.into(),
            metadata,
            entities: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Store a new entity
    ///
    /// When the repository has a single identifier field and the body leaves
    /// it out (or null), the next integer id is assigned.
    pub fn insert(&self, body: Value) -> ServiceResult<Value> {
        let Value::Object(mut object) = body else {
            return Err(ServiceError::bad_request(
                ServiceOperation::Create,
                "Request body must be a JSON object",
            ));
        };

        let identifier = self.metadata.identifier();
        if let [field] = identifier {
            if object.get(field).map_or(true, Value::is_null) {
                let next = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
                object.insert(field.clone(), Value::from(next));
            }
        }

        let key = key_of(identifier, &object).ok_or_else(|| {
            ServiceError::validation_failed(
                ServiceOperation::Create,
                format!("Missing identifier field(s): {}", identifier.join(",")),
            )
        })?;

        match self.entities.entry(key) {
            Entry::Occupied(slot) => Err(ServiceError::already_exists(
                self.entity_type.as_str(),
                slot.key().as_str(),
            )),
            Entry::Vacant(slot) => {
                if let [field] = identifier {
                    if let Some(n) = object.get(field).and_then(Value::as_u64) {
                        self.next_id.fetch_max(n.saturating_add(1), AtomicOrdering::SeqCst);
                    }
                }
                let entity = Value::Object(object);
                slot.insert(entity.clone());
                Ok(entity)
            }
        }
    }

    /// Matching entities, ordered, before any windowing
    fn select(&self, criteria: &Criteria) -> Vec<Value> {
        let mut items: Vec<Value> = self
            .entities
            .iter()
            .filter(|entry| criteria.filters.iter().all(|c| matches(entry.value(), c)))
            .map(|entry| entry.value().clone())
            .collect();

        let identifier = self.metadata.identifier();
        items.sort_by(|a, b| {
            for term in &criteria.order {
                let ordering = compare_values(field(a, &term.field), field(b, &term.field));
                let ordering = match term.direction {
                    OrderDirection::Ascending => ordering,
                    OrderDirection::Descending => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            identifier
                .iter()
                .map(|name| compare_values(field(a, name), field(b, name)))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        items
    }

    fn not_found(&self, id: &ResourceId, operation: ServiceOperation) -> ServiceError {
        ServiceError::not_found(self.entity_type.as_str(), id.to_string()).with_operation(operation)
    }

    fn single_key<'a>(
        &self,
        id: &'a ResourceId,
        operation: ServiceOperation,
    ) -> ServiceResult<&'a str> {
        match id {
            ResourceId::Single(raw) => Ok(raw.as_str()),
            ResourceId::Composite(_) => Err(ServiceError::bad_request(
                operation,
                "Composite ids are only accepted by delete",
            )),
        }
    }
}

impl ResourceService for MemoryService {
    type Entity = Value;
    type Create = Value;
    type Update = Value;
    type Deleted = Vec<Value>;

    fn repository(&self) -> &dyn RepositoryMetadata {
        &self.metadata
    }

    async fn paginate(&self, criteria: Criteria) -> ServiceResult<Page<Value>> {
        let items = self.select(&criteria);
        let total = items.len() as u64;
        let Some(window) = criteria.pagination else {
            let per_page = total.max(1);
            return Ok(Page::new(items, total, per_page, 1));
        };

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        let page: Vec<Value> = items.into_iter().skip(offset).take(limit).collect();

        tracing::debug!(
            entity = %self.entity_type,
            total,
            returned = page.len(),
            "Paginated in-memory listing"
        );
        Ok(Page::new(page, total, window.per_page(), window.current_page()))
    }

    async fn search(&self, criteria: Criteria) -> ServiceResult<SearchResult<Value>> {
        let items = self.select(&criteria);
        let total = items.len() as u64;
        tracing::debug!(entity = %self.entity_type, total, "Searched in-memory listing");
        Ok(SearchResult::new(items, total))
    }

    async fn create(&self, body: Value) -> ServiceResult<Value> {
        self.insert(body)
    }

    async fn read(&self, id: &ResourceId) -> ServiceResult<Value> {
        let key = self.single_key(id, ServiceOperation::Read)?;
        self.entities
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| self.not_found(id, ServiceOperation::Read))
    }

    async fn update(&self, id: &ResourceId, body: Value) -> ServiceResult<Value> {
        let key = self.single_key(id, ServiceOperation::Update)?;
        let Value::Object(changes) = body else {
            return Err(ServiceError::bad_request(
                ServiceOperation::Update,
                "Request body must be a JSON object",
            ));
        };

        let mut entry = self
            .entities
            .get_mut(key)
            .ok_or_else(|| self.not_found(id, ServiceOperation::Update))?;

        let identifier = self.metadata.identifier();
        if let Value::Object(object) = entry.value_mut() {
            // identifier fields are the storage key and stay fixed
            for (name, value) in changes {
                if !identifier.contains(&name) {
                    object.insert(name, value);
                }
            }
        }
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: &ResourceId) -> ServiceResult<Vec<Value>> {
        match id {
            ResourceId::Single(raw) => self
                .entities
                .remove(raw)
                .map(|(_, entity)| vec![entity])
                .ok_or_else(|| self.not_found(id, ServiceOperation::Delete)),
            ResourceId::Composite(fields) => {
                let keys: Vec<String> = self
                    .entities
                    .iter()
                    .filter(|entry| {
                        fields.iter().all(|(name, values)| {
                            scalar_text(field(entry.value(), name))
                                .is_some_and(|text| values.contains(&text))
                        })
                    })
                    .map(|entry| entry.key().clone())
                    .collect();

                let removed: Vec<Value> = keys
                    .iter()
                    .filter_map(|key| self.entities.remove(key).map(|(_, entity)| entity))
                    .collect();
                tracing::debug!(
                    entity = %self.entity_type,
                    id = %id,
                    removed = removed.len(),
                    "Deleted by composite id"
                );
                Ok(removed)
            }
        }
    }
}

fn field<'a>(entity: &'a Value, name: &str) -> &'a Value {
    entity.get(name).unwrap_or(&Value::Null)
}

/// Storage key: identifier values joined with `,`
fn key_of(identifier: &[String], object: &Map<String, Value>) -> Option<String> {
    let parts: Option<Vec<String>> = identifier
        .iter()
        .map(|name| object.get(name).and_then(scalar_text))
        .collect();
    parts.filter(|p| !p.is_empty()).map(|p| p.join(","))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn matches(entity: &Value, condition: &FilterCondition) -> bool {
    let value = field(entity, &condition.field);
    match (condition.operator, &condition.value) {
        (FilterOperator::IsNull, _) => value.is_null(),
        (FilterOperator::IsNotNull, _) => !value.is_null(),
        (FilterOperator::In, FilterValue::List(list)) => {
            let equal = |item: &String| compare_raw(value, item) == Some(Ordering::Equal);
            !value.is_null() && list.iter().any(equal)
        }
        (FilterOperator::NotIn, FilterValue::List(list)) => {
            let equal = |item: &String| compare_raw(value, item) == Some(Ordering::Equal);
            !value.is_null() && !list.iter().any(equal)
        }
        (FilterOperator::Like, FilterValue::String(pattern)) => {
            scalar_text(value).is_some_and(|text| like_match(&text, pattern))
        }
        (operator, FilterValue::String(raw)) => {
            let Some(ordering) = compare_raw(value, raw) else {
                return false;
            };
            match operator {
                FilterOperator::Equal => ordering == Ordering::Equal,
                FilterOperator::NotEqual => ordering != Ordering::Equal,
                FilterOperator::GreaterThan => ordering == Ordering::Greater,
                FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
                FilterOperator::LessThan => ordering == Ordering::Less,
                FilterOperator::LessThanOrEqual => ordering != Ordering::Greater,
                _ => false,
            }
        }
        _ => false,
    }
}

/// Compare a stored value against raw query text
fn compare_raw(value: &Value, raw: &str) -> Option<Ordering> {
    match value {
        Value::Null => None,
        Value::Number(n) => match (n.as_f64(), raw.trim().parse::<f64>()) {
            (Some(left), Ok(right)) => left.partial_cmp(&right),
            _ => Some(n.to_string().as_str().cmp(raw)),
        },
        Value::Bool(b) => parse_bool(raw).map(|right| b.cmp(&right)),
        other => scalar_text(other).map(|text| text.as_str().cmp(raw)),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Ordering between two stored values; nulls sort first
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => x.to_string().cmp(&y.to_string()),
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => scalar_text(a).cmp(&scalar_text(b)),
    }
}

/// SQL `LIKE` with `%` (any run) and `_` (any one char), case-insensitive
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        // `%` is always a wildcard, even against a literal `%` in the text
        if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if let Some((star, from)) = backtrack {
            p = star + 1;
            t = from + 1;
            backtrack = Some((star, from + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}
