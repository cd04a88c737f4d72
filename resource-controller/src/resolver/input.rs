//! Decoded query-string input

use serde::{Deserialize, Serialize};

/// Ordered `(key, value)` pairs decoded from a query string
///
/// Repeated keys are kept in input order, so the same field may be filtered
/// more than once. Scalar lookups ([`QueryInput::last`]) see the last value.
///
/// # Example
///
/// ```rust
/// use resource_controller::resolver::QueryInput;
///
/// let input = QueryInput::parse("age__gte=18&age__lte=65&page=1&page=3");
/// assert_eq!(input.len(), 4);
/// assert_eq!(input.last("page"), Some("3"));
/// assert_eq!(input.last("sort"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryInput {
    pairs: Vec<(String, String)>,
}

impl QueryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw query string (without the leading `?`)
    ///
    /// Input that is not valid form encoding yields an empty input.
    pub fn parse(raw: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
            Ok(pairs) => Self { pairs },
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring undecodable query string");
                Self::default()
            }
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Last value given for `key`
    pub fn last(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy of this input with `key` set to `value`
    ///
    /// The first occurrence is replaced in place and later ones dropped; a
    /// missing key is appended.
    #[must_use]
    pub fn with_value(&self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        let mut replaced = false;
        for (k, v) in &self.pairs {
            if k == key {
                if !replaced {
                    pairs.push((k.clone(), value.clone()));
                    replaced = true;
                }
            } else {
                pairs.push((k.clone(), v.clone()));
            }
        }
        if !replaced {
            pairs.push((key.to_string(), value));
        }
        Self { pairs }
    }

    /// Re-encode as a query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

/// `0`, `false`, `no` and `off` (any case, surrounding blanks ignored)
pub fn is_falsy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_and_keeps_order() {
        let input = QueryInput::parse("name=John+Doe&tag=a%2Cb&tag=c");
        let pairs: Vec<(&str, &str)> = input.iter().collect();
        assert_eq!(
            pairs,
            vec![("name", "John Doe"), ("tag", "a,b"), ("tag", "c")]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(QueryInput::parse("").is_empty());
    }

    #[test]
    fn test_with_value_replaces_in_place() {
        let input = QueryInput::parse("page=2&sort=-name&page=5");
        let next = input.with_value("page", "3");
        assert_eq!(next.to_query_string(), "page=3&sort=-name");
    }

    #[test]
    fn test_with_value_appends_missing_key() {
        let input = QueryInput::parse("status=active");
        assert_eq!(
            input.with_value("page", "2").to_query_string(),
            "status=active&page=2"
        );
    }

    #[test]
    fn test_to_query_string_encodes() {
        let input = QueryInput::from_pairs([("q", "a b&c")]);
        assert_eq!(input.to_query_string(), "q=a+b%26c");
    }

    #[test]
    fn test_is_falsy() {
        for value in ["0", "false", "FALSE", " no ", "Off"] {
            assert!(is_falsy(value), "{value} should be falsy");
        }
        for value in ["1", "true", "", "yes", "maybe"] {
            assert!(!is_falsy(value), "{value} should not be falsy");
        }
    }
}
