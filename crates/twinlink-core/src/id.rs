//! Namespaced entity identifiers.
//!
//! Entities (things, policies, connections) are addressed as `namespace:name`.
//! The namespace is a dot separated list of segments, each starting with a
//! letter followed by letters, digits or `_`; it may be empty. The name is
//! everything after the first `:`, must be non-empty and must not contain
//! control characters or `/`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between namespace and name.
pub const SEPARATOR: char = ':';

/// Upper bound on the length of a full identifier.
pub const MAX_ID_LENGTH: usize = 256;

/// Identifier parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("'{0}' is not of the form 'namespace:name'")]
    MissingSeparator(String),

    #[error("'{id}' has an invalid namespace '{namespace}'")]
    InvalidNamespace { id: String, namespace: String },

    #[error("'{0}' has an empty or invalid name")]
    InvalidName(String),

    #[error("'{id}' exceeds the maximum length of {max} characters")]
    TooLong { id: String, max: usize },
}

/// A parsed `namespace:name` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamespacedId {
    namespace: String,
    name: String,
}

impl NamespacedId {
    /// Parse an identifier, reporting why it is malformed.
    pub fn parse(id: &str) -> Result<Self, IdError> {
        if id.chars().count() > MAX_ID_LENGTH {
            return Err(IdError::TooLong {
                id: id.to_string(),
                max: MAX_ID_LENGTH,
            });
        }

        let (namespace, name) = id
            .split_once(SEPARATOR)
            .ok_or_else(|| IdError::MissingSeparator(id.to_string()))?;

        if !is_valid_namespace(namespace) {
            return Err(IdError::InvalidNamespace {
                id: id.to_string(),
                namespace: namespace.to_string(),
            });
        }
        if !is_valid_name(name) {
            return Err(IdError::InvalidName(id.to_string()));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse an identifier, discarding the reason on failure.
    pub fn parse_lenient(id: &str) -> Option<Self> {
        Self::parse(id).ok()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NamespacedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, SEPARATOR, self.name)
    }
}

impl FromStr for NamespacedId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NamespacedId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NamespacedId> for String {
    fn from(id: NamespacedId) -> Self {
        id.to_string()
    }
}

/// Identifier of a thing (digital twin).
///
/// Same syntax as [`NamespacedId`], kept as its own type so thing ids cannot
/// be confused with other entity ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(NamespacedId);

impl ThingId {
    pub fn parse(id: &str) -> Result<Self, IdError> {
        NamespacedId::parse(id).map(Self)
    }

    pub fn namespace(&self) -> &str {
        self.0.namespace()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn as_namespaced(&self) -> &NamespacedId {
        &self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ThingId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_valid_namespace(namespace: &str) -> bool {
    namespace.is_empty() || namespace.split('.').all(is_valid_namespace_segment)
}

fn is_valid_namespace_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_control() || c == '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = NamespacedId::parse("org.eclipse:device-1").unwrap();
        assert_eq!(id.namespace(), "org.eclipse");
        assert_eq!(id.name(), "device-1");
        assert_eq!(id.to_string(), "org.eclipse:device-1");
    }

    #[test]
    fn test_parse_empty_namespace() {
        let id = NamespacedId::parse(":device").unwrap();
        assert_eq!(id.namespace(), "");
        assert_eq!(id.name(), "device");
    }

    #[test]
    fn test_name_may_contain_separator() {
        let id = NamespacedId::parse("ns:a:b").unwrap();
        assert_eq!(id.namespace(), "ns");
        assert_eq!(id.name(), "a:b");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            NamespacedId::parse("no-separator"),
            Err(IdError::MissingSeparator(_))
        ));
        assert!(matches!(
            NamespacedId::parse("1ns:name"),
            Err(IdError::InvalidNamespace { .. })
        ));
        assert!(matches!(
            NamespacedId::parse("ns..x:name"),
            Err(IdError::InvalidNamespace { .. })
        ));
        assert!(matches!(NamespacedId::parse("ns:"), Err(IdError::InvalidName(_))));
        assert!(matches!(
            NamespacedId::parse("ns:a/b"),
            Err(IdError::InvalidName(_))
        ));

        let long = format!("ns:{}", "x".repeat(MAX_ID_LENGTH));
        assert!(matches!(
            NamespacedId::parse(&long),
            Err(IdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_lenient_parse() {
        assert!(NamespacedId::parse_lenient("garbage").is_none());
        assert!(NamespacedId::parse_lenient("ns:ok").is_some());
    }

    #[test]
    fn test_thing_id_serde() {
        let id = ThingId::parse("ns:foo").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ns:foo\"");

        let back: ThingId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<ThingId>("\"invalid\"").is_err());
    }
}
