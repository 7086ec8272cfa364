//! Binding placeholders to a source for one resolution call.

use crate::error::Result;
use crate::placeholders::Placeholder;
use twinlink_core::config::placeholder::VALIDATION_SENTINEL;

/// Resolves names under one prefix. This is what an
/// [`ExpressionResolver`](crate::ExpressionResolver) chain consists of.
pub trait Resolver {
    fn prefix(&self) -> &str;

    fn supports(&self, name: &str) -> bool;

    fn resolve(&self, name: &str) -> Result<Option<String>>;

    /// Whether values come from a fixed replacement instead of live data.
    fn is_for_validation(&self) -> bool {
        false
    }
}

/// How a [`PlaceholderResolver`] obtains values.
pub enum ResolverMode<'a, S: ?Sized> {
    /// Resolve against live data; `None` when no source is available.
    Bound(Option<&'a S>),
    /// Resolve every supported name to the given replacement.
    ForValidation(&'a str),
}

impl<S: ?Sized> Clone for ResolverMode<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for ResolverMode<'_, S> {}

/// A placeholder paired with a [`ResolverMode`].
pub struct PlaceholderResolver<'a, P: ?Sized + Placeholder> {
    placeholder: &'a P,
    mode: ResolverMode<'a, P::Source>,
}

impl<'a, P: ?Sized + Placeholder> PlaceholderResolver<'a, P> {
    pub fn new(placeholder: &'a P, mode: ResolverMode<'a, P::Source>) -> Self {
        Self { placeholder, mode }
    }

    /// Resolve against `source`.
    pub fn bound(placeholder: &'a P, source: &'a P::Source) -> Self {
        Self::new(placeholder, ResolverMode::Bound(Some(source)))
    }

    /// Resolve against a source that is not available; nothing resolves.
    pub fn unbound(placeholder: &'a P) -> Self {
        Self::new(placeholder, ResolverMode::Bound(None))
    }

    /// Resolve every supported name to the validation sentinel.
    pub fn for_validation(placeholder: &'a P) -> Self {
        Self::for_validation_with(placeholder, VALIDATION_SENTINEL)
    }

    /// Resolve every supported name to `replacement`.
    pub fn for_validation_with(placeholder: &'a P, replacement: &'a str) -> Self {
        Self::new(placeholder, ResolverMode::ForValidation(replacement))
    }

    pub fn placeholder(&self) -> &'a P {
        self.placeholder
    }
}

impl<P: ?Sized + Placeholder> Resolver for PlaceholderResolver<'_, P> {
    fn prefix(&self) -> &str {
        self.placeholder.prefix()
    }

    fn supports(&self, name: &str) -> bool {
        self.placeholder.supports(name)
    }

    fn resolve(&self, name: &str) -> Result<Option<String>> {
        match self.mode {
            ResolverMode::ForValidation(replacement) => {
                Ok(self.supports(name).then(|| replacement.to_string()))
            }
            ResolverMode::Bound(None) => Ok(None),
            ResolverMode::Bound(Some(source)) => self.placeholder.resolve(source, name),
        }
    }

    fn is_for_validation(&self) -> bool {
        matches!(self.mode, ResolverMode::ForValidation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholders::{HEADERS_PLACEHOLDER, THING_PLACEHOLDER};
    use twinlink_core::Headers;

    #[test]
    fn test_bound_resolver_delegates() {
        let resolver = PlaceholderResolver::bound(&THING_PLACEHOLDER, "ns:foo");
        assert_eq!(resolver.prefix(), "thing");
        assert_eq!(resolver.resolve("name").unwrap().as_deref(), Some("foo"));
        assert!(!resolver.is_for_validation());
    }

    #[test]
    fn test_unbound_resolver_resolves_nothing() {
        let resolver = PlaceholderResolver::unbound(&THING_PLACEHOLDER);
        assert_eq!(resolver.resolve("id").unwrap(), None);
    }

    #[test]
    fn test_validation_ignores_data() {
        let resolver = PlaceholderResolver::for_validation(&THING_PLACEHOLDER);
        assert!(resolver.is_for_validation());
        assert_eq!(
            resolver.resolve("namespace").unwrap().as_deref(),
            Some(VALIDATION_SENTINEL)
        );
        assert_eq!(resolver.resolve("unsupported").unwrap(), None);
    }

    #[test]
    fn test_bound_headers() {
        let headers = Headers::new().with("device_id", "foo");
        let resolver = PlaceholderResolver::bound(&HEADERS_PLACEHOLDER, &headers);
        assert_eq!(resolver.resolve("device_id").unwrap().as_deref(), Some("foo"));
    }
}
