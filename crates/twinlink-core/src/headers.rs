//! Immutable message headers.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Header carrying the correlation id of a signal.
pub const CORRELATION_ID: &str = "correlation-id";

/// String-keyed header lookup.
///
/// Implemented by [`Headers`] and by plain maps so that placeholder
/// resolution does not depend on a concrete header container.
pub trait HeaderLookup {
    /// Value of the header `key`, if present.
    fn header(&self, key: &str) -> Option<&str>;
}

/// Case-insensitive, immutable header map.
///
/// Keys are stored lower-cased; iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key` set to `value`.
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.get(CORRELATION_ID)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Headers::new(), |headers, (k, v)| headers.with(k, v))
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl HeaderLookup for Headers {
    fn header(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl HeaderLookup for HashMap<String, String> {
    fn header(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl HeaderLookup for BTreeMap<String, String> {
    fn header(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_insensitive_lookup() {
        let headers = Headers::new().with("Device-ID", "sensor-1");
        assert_eq!(headers.get("device-id"), Some("sensor-1"));
        assert_eq!(headers.header("DEVICE-ID"), Some("sensor-1"));
        assert!(headers.get("missing").is_none());
    }

    #[test]
    fn test_deserialize_lowercases_keys() {
        let headers: Headers =
            serde_json::from_value(json!({"Correlation-Id": "abc", "x": "1"})).unwrap();
        assert_eq!(headers.correlation_id(), Some("abc"));
        assert_eq!(headers.len(), 2);
        assert_eq!(
            serde_json::to_value(&headers).unwrap(),
            json!({"correlation-id": "abc", "x": "1"})
        );
    }

    #[test]
    fn test_hash_map_lookup_is_exact() {
        let mut map = HashMap::new();
        map.insert("device_id".to_string(), "foo".to_string());
        assert_eq!(map.header("device_id"), Some("foo"));
        assert_eq!(map.header("DEVICE_ID"), None);
    }
}
