//! Entry points for applying and validating templates.

use crate::error::{PlaceholderError, Result};
use crate::expression::{env_config, ExpressionResolver};
use crate::placeholders::{AnyPlaceholder, Placeholder};
use twinlink_core::config::placeholder::{END_MARKER, START_MARKER, VALIDATION_SENTINEL};
use twinlink_core::config::PlaceholderConfig;

/// Facade over [`ExpressionResolver`] used by connection configuration and
/// message processing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderFilter;

impl PlaceholderFilter {
    /// Resolve `template` with live data.
    pub fn apply(
        template: &str,
        resolver: &ExpressionResolver<'_>,
        allow_unresolved: bool,
    ) -> Result<String> {
        resolver.resolve(template, allow_unresolved)
    }

    /// Resolve `template` against a single placeholder bound to `source`.
    /// Every occurrence must resolve.
    pub fn apply_placeholder<P>(template: &str, placeholder: &P, source: &P::Source) -> Result<String>
    where
        P: ?Sized + Placeholder,
    {
        ExpressionResolver::new()
            .with_placeholder(placeholder, source)
            .resolve(template, false)
    }

    /// Check that `template` only references names the given placeholders
    /// support and only calls known functions with valid parameters.
    pub fn validate(template: &str, placeholders: &[&dyn AnyPlaceholder]) -> Result<()> {
        Self::validate_with_config(template, placeholders, env_config())
    }

    /// [`validate`](Self::validate) bounded by `config`.
    pub fn validate_with_config(
        template: &str,
        placeholders: &[&dyn AnyPlaceholder],
        config: &PlaceholderConfig,
    ) -> Result<()> {
        Self::validate_and_replace_with_config(template, VALIDATION_SENTINEL, placeholders, config)
            .map(drop)
    }

    /// Validate `template` and return it with every reference replaced by
    /// `replacement`, e.g. to check the syntax of the resulting address.
    ///
    /// Each placeholder gets its own pass over the output of the previous
    /// one; only the last pass must leave nothing unresolved. Function stages
    /// are checked but do not alter the replacement, and occurrences removed
    /// by `fn:delete()` are dropped from the output. A replacement containing
    /// placeholder markers is rejected with `ExpressionInvalid`.
    pub fn validate_and_replace(
        template: &str,
        replacement: &str,
        placeholders: &[&dyn AnyPlaceholder],
    ) -> Result<String> {
        Self::validate_and_replace_with_config(template, replacement, placeholders, env_config())
    }

    /// [`validate_and_replace`](Self::validate_and_replace) bounded by `config`.
    pub fn validate_and_replace_with_config(
        template: &str,
        replacement: &str,
        placeholders: &[&dyn AnyPlaceholder],
        config: &PlaceholderConfig,
    ) -> Result<String> {
        if replacement.contains(START_MARKER) || replacement.contains(END_MARKER) {
            return Err(PlaceholderError::invalid_expression(
                replacement,
                "the replacement must not contain placeholder markers",
            ));
        }

        let Some((last, rest)) = placeholders.split_last() else {
            return ExpressionResolver::new()
                .with_config(config)
                .resolve_omitting_deleted(template, false);
        };

        let mut current = template.to_string();
        for placeholder in rest {
            current = ExpressionResolver::new()
                .with_config(config)
                .with_validation(*placeholder, replacement)
                .resolve_omitting_deleted(&current, true)?;
        }
        let replaced = ExpressionResolver::new()
            .with_config(config)
            .with_validation(*last, replacement)
            .resolve_omitting_deleted(&current, false)?;

        tracing::trace!(template, replaced = %replaced, "template validated");
        Ok(replaced)
    }
}
