//! Shared configuration defaults.
//!
//! Constants and environment variable names used across the workspace live
//! here so every crate reads the same values.

use serde::{Deserialize, Serialize};

/// Placeholder engine defaults.
pub mod placeholder {
    /// Maximum number of `fn:` stages allowed in one expression. Also bounds
    /// the parenthesis nesting depth of a single stage.
    pub const DEFAULT_MAX_CHAINED_FUNCTIONS: usize = 10;

    /// Smallest usable chain bound; lower values are raised to it.
    pub const MIN_CHAINED_FUNCTIONS: usize = 1;

    /// Value returned for every supported name when resolving for validation.
    pub const VALIDATION_SENTINEL: &str = "_validated_";

    /// Opening marker of a placeholder expression.
    pub const START_MARKER: &str = "{{";

    /// Closing marker of a placeholder expression.
    pub const END_MARKER: &str = "}}";
}

/// Environment variable names.
pub mod env_vars {
    /// Overrides [`super::placeholder::DEFAULT_MAX_CHAINED_FUNCTIONS`].
    pub const MAX_CHAINED_FUNCTIONS: &str = "TWINLINK_MAX_CHAINED_FUNCTIONS";
    /// Switches log output to JSON when set to `true`.
    pub const LOG_JSON: &str = "TWINLINK_LOG_JSON";
}

/// Reads the function chain bound from the environment, or returns the default.
///
/// Values below [`placeholder::MIN_CHAINED_FUNCTIONS`] fall back to the
/// default as well.
pub fn max_chained_functions() -> usize {
    std::env::var(env_vars::MAX_CHAINED_FUNCTIONS)
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|max| *max >= placeholder::MIN_CHAINED_FUNCTIONS)
        .unwrap_or(placeholder::DEFAULT_MAX_CHAINED_FUNCTIONS)
}

/// Placeholder engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Maximum number of chained pipeline functions per expression.
    pub max_chained_functions: usize,
}

impl PlaceholderConfig {
    /// Build the configuration from environment overrides.
    pub fn from_env() -> Self {
        Self {
            max_chained_functions: max_chained_functions(),
        }
    }

    /// Set the chain bound, raising it to
    /// [`placeholder::MIN_CHAINED_FUNCTIONS`] if lower.
    pub fn with_max_chained_functions(mut self, max: usize) -> Self {
        self.max_chained_functions = max.max(placeholder::MIN_CHAINED_FUNCTIONS);
        self
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            max_chained_functions: placeholder::DEFAULT_MAX_CHAINED_FUNCTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlaceholderConfig::default();
        assert_eq!(
            config.max_chained_functions,
            placeholder::DEFAULT_MAX_CHAINED_FUNCTIONS
        );
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: PlaceholderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlaceholderConfig::default());

        let config: PlaceholderConfig =
            serde_json::from_str(r#"{"max_chained_functions": 3}"#).unwrap();
        assert_eq!(config.max_chained_functions, 3);
    }

    #[test]
    fn test_zero_bound_is_raised() {
        let config = PlaceholderConfig::default().with_max_chained_functions(0);
        assert_eq!(
            config.max_chained_functions,
            placeholder::MIN_CHAINED_FUNCTIONS
        );
    }

    #[test]
    fn test_sentinel_has_no_markers() {
        assert!(!placeholder::VALIDATION_SENTINEL.contains(placeholder::START_MARKER));
        assert!(!placeholder::VALIDATION_SENTINEL.contains(placeholder::END_MARKER));
    }
}
