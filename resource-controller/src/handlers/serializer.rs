//! Entity → JSON conversion for response payloads

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Turns an entity or a collection of entities into response data
pub trait Serializer: Send + Sync {
    fn to_array<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value>;
}

/// serde-backed [`Serializer`] that can drop fields from every emitted object
///
/// # Example
///
/// ```rust
/// use resource_controller::handlers::{JsonSerializer, Serializer};
/// use serde_json::json;
///
/// let serializer = JsonSerializer::new().hide(["password"]);
/// let users = vec![json!({"id": 1, "password": "x"}), json!({"id": 2})];
///
/// assert_eq!(
///     serializer.to_array(&users).unwrap(),
///     json!([{"id": 1}, {"id": 2}])
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    hidden: Vec<String>,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names removed from top-level objects and list elements
    #[must_use]
    pub fn hide<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.hidden.extend(fields.into_iter().map(Into::into));
        self
    }

    fn strip(&self, value: &mut Value) {
        match value {
            Value::Object(object) => {
                for field in &self.hidden {
                    object.remove(field);
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut().filter(|item| item.is_object()) {
                    self.strip(item);
                }
            }
            _ => {}
        }
    }
}

impl Serializer for JsonSerializer {
    fn to_array<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value> {
        let mut value = serde_json::to_value(value)?;
        if !self.hidden.is_empty() {
            self.strip(&mut value);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct User {
        id: u32,
        email: String,
        token: String,
    }

    #[test]
    fn test_plain_serialization() {
        let user = User {
            id: 1,
            email: "a@b.c".into(),
            token: "t".into(),
        };
        let value = JsonSerializer::new().to_array(&user).unwrap();
        assert_eq!(value, json!({"id": 1, "email": "a@b.c", "token": "t"}));
    }

    #[test]
    fn test_hidden_fields_removed_from_struct() {
        let user = User {
            id: 1,
            email: "a@b.c".into(),
            token: "t".into(),
        };
        let value = JsonSerializer::new().hide(["token"]).to_array(&user).unwrap();
        assert_eq!(value, json!({"id": 1, "email": "a@b.c"}));
    }

    #[test]
    fn test_nested_objects_untouched() {
        let value = JsonSerializer::new()
            .hide(["secret"])
            .to_array(&json!({"id": 1, "owner": {"secret": "kept"}}))
            .unwrap();
        assert_eq!(value, json!({"id": 1, "owner": {"secret": "kept"}}));
    }

    #[test]
    fn test_scalars_and_strings() {
        let serializer = JsonSerializer::new().hide(["x"]);
        assert_eq!(serializer.to_array(&["XXX"]).unwrap(), json!(["XXX"]));
        assert_eq!(serializer.to_array(&3).unwrap(), json!(3));
    }

    #[test]
    fn test_non_string_map_keys_fail() {
        let mut map: HashMap<(u8, u8), u8> = HashMap::new();
        map.insert((1, 2), 3);
        assert!(JsonSerializer::new().to_array(&map).is_err());
    }
}
