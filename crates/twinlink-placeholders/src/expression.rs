//! Template resolution against an ordered chain of resolvers.

use crate::element::PipelineElement;
use crate::error::{PlaceholderError, Result};
use crate::parser::{self, Expression, PlaceholderRef, Segment};
use crate::pipeline::Pipeline;
use crate::placeholders::{AnyPlaceholder, Placeholder};
use crate::resolver::{PlaceholderResolver, Resolver};
use once_cell::sync::Lazy;
use std::fmt;
use twinlink_core::config::placeholder::MIN_CHAINED_FUNCTIONS;
use twinlink_core::config::PlaceholderConfig;

static ENV_CONFIG: Lazy<PlaceholderConfig> = Lazy::new(PlaceholderConfig::from_env);

/// Configuration read from the environment on first use.
pub fn env_config() -> &'static PlaceholderConfig {
    &ENV_CONFIG
}

/// Resolves `{{ prefix:name | fn:... }}` templates.
///
/// Every occurrence is offered to the resolvers whose prefix matches, in
/// registration order; the first one producing a resolved or deleted value
/// wins. Substituted values are never scanned again.
///
/// ```
/// use twinlink_core::Headers;
/// use twinlink_placeholders::placeholders::{HEADERS_PLACEHOLDER, THING_PLACEHOLDER};
/// use twinlink_placeholders::ExpressionResolver;
///
/// let headers = Headers::new().with("device_id", "lamp-1");
/// let resolver = ExpressionResolver::new()
///     .with_placeholder(&THING_PLACEHOLDER, "org.acme:lamp-1")
///     .with_placeholder(&HEADERS_PLACEHOLDER, &headers);
///
/// let address = resolver
///     .resolve("{{ thing:namespace }}/{{ header:device_id | fn:upper() }}", false)
///     .unwrap();
/// assert_eq!(address, "org.acme/LAMP-1");
/// ```
pub struct ExpressionResolver<'a> {
    resolvers: Vec<Box<dyn Resolver + 'a>>,
    max_chained_functions: usize,
}

/// One scanned piece of a template.
enum Part<'t> {
    Literal(&'t str),
    Expression {
        raw: &'t str,
        expression: Expression,
    },
}

/// Outcome of substituting every occurrence of a template.
struct Substitution<'t> {
    output: String,
    first_unresolved: Option<&'t str>,
    deleted: bool,
}

impl<'a> ExpressionResolver<'a> {
    /// A resolver without placeholders, bounded by the environment config.
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
            max_chained_functions: ENV_CONFIG.max_chained_functions,
        }
    }

    pub fn with_config(self, config: &PlaceholderConfig) -> Self {
        self.with_max_chained_functions(config.max_chained_functions)
    }

    /// Bound the number of chained functions; values below
    /// [`MIN_CHAINED_FUNCTIONS`] are raised to it.
    pub fn with_max_chained_functions(mut self, max: usize) -> Self {
        self.max_chained_functions = max.max(MIN_CHAINED_FUNCTIONS);
        self
    }

    pub fn with_resolver<R: Resolver + 'a>(self, resolver: R) -> Self {
        self.with_boxed_resolver(Box::new(resolver))
    }

    pub fn with_boxed_resolver(mut self, resolver: Box<dyn Resolver + 'a>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Register `placeholder` bound to `source`.
    pub fn with_placeholder<P>(self, placeholder: &'a P, source: &'a P::Source) -> Self
    where
        P: ?Sized + Placeholder + 'a,
    {
        self.with_resolver(PlaceholderResolver::bound(placeholder, source))
    }

    /// Register `placeholder` without a source; its names stay unresolved
    /// unless a `fn:default` stage supplies a value.
    pub fn with_unbound<P>(self, placeholder: &'a P) -> Self
    where
        P: ?Sized + Placeholder + 'a,
    {
        self.with_resolver(PlaceholderResolver::unbound(placeholder))
    }

    /// Register `placeholder` in validation mode, resolving every supported
    /// name to `replacement`.
    pub fn with_validation(self, placeholder: &'a dyn AnyPlaceholder, replacement: &'a str) -> Self {
        self.with_boxed_resolver(placeholder.validation_resolver(replacement))
    }

    pub fn max_chained_functions(&self) -> usize {
        self.max_chained_functions
    }

    /// Prefixes of the registered resolvers, in order.
    pub fn prefixes(&self) -> Vec<&str> {
        self.resolvers.iter().map(|resolver| resolver.prefix()).collect()
    }

    /// Substitute every placeholder occurrence in `template`.
    ///
    /// With `allow_unresolved`, occurrences no resolver could resolve (or
    /// that were deleted) are kept verbatim; otherwise the first of them
    /// fails the call with `UnresolvedPlaceholder`. Malformed expressions,
    /// unknown functions and invalid signatures always fail, whether or not
    /// their occurrence would have resolved.
    pub fn resolve(&self, template: &str, allow_unresolved: bool) -> Result<String> {
        self.finish(template, self.substitute(template, false)?, allow_unresolved)
    }

    /// Like [`resolve`](Self::resolve), but deleted occurrences are removed
    /// from the output instead of counting as unresolved.
    pub fn resolve_omitting_deleted(&self, template: &str, allow_unresolved: bool) -> Result<String> {
        self.finish(template, self.substitute(template, true)?, allow_unresolved)
    }

    fn finish(
        &self,
        template: &str,
        substitution: Substitution<'_>,
        allow_unresolved: bool,
    ) -> Result<String> {
        match substitution.first_unresolved {
            Some(raw) if !allow_unresolved => Err(PlaceholderError::UnresolvedPlaceholder {
                placeholder: raw.to_string(),
                template: template.to_string(),
            }),
            _ => Ok(substitution.output),
        }
    }

    /// Resolve `template` into a single [`PipelineElement`].
    ///
    /// `Deleted` if any occurrence was deleted, `Unresolved` if any could
    /// not be resolved, otherwise the fully substituted string.
    pub fn resolve_as_element(&self, template: &str) -> Result<PipelineElement> {
        let substitution = self.substitute(template, false)?;
        Ok(if substitution.deleted {
            PipelineElement::Deleted
        } else if substitution.first_unresolved.is_some() {
            PipelineElement::Unresolved
        } else {
            PipelineElement::Resolved(substitution.output)
        })
    }

    /// Resolve one expression given without markers, e.g. `thing:name` or
    /// `header:device_id | fn:lower()`.
    pub fn resolve_single_placeholder(&self, expression: &str) -> Result<Option<String>> {
        let expression = parser::parse_expression(expression, self.max_chained_functions)?;
        let pipeline = Pipeline::new(&expression)?;
        Ok(self.evaluate(&expression, &pipeline)?.into_option())
    }

    /// Value of the first resolver that matches the prefix and supports the
    /// name of `reference`.
    pub fn resolve_reference(&self, reference: &PlaceholderRef) -> Result<Option<String>> {
        for resolver in self.matching(&reference.prefix) {
            if resolver.supports(&reference.name) {
                return resolver.resolve(&reference.name);
            }
        }
        Ok(None)
    }

    fn matching<'s>(&'s self, prefix: &'s str) -> impl Iterator<Item = &'s (dyn Resolver + 'a)> {
        self.resolvers
            .iter()
            .map(|resolver| &**resolver)
            .filter(move |resolver| resolver.prefix() == prefix)
    }

    /// Parse the whole template before anything is resolved.
    fn parse<'t>(&self, template: &'t str) -> Result<Vec<Part<'t>>> {
        parser::scan(template)?
            .into_iter()
            .map(|segment| -> Result<Part<'t>> {
                match segment {
                    Segment::Literal(text) => Ok(Part::Literal(text)),
                    Segment::Placeholder { raw, content } => {
                        let expression =
                            parser::parse_expression(content, self.max_chained_functions)?;
                        Ok(Part::Expression { raw, expression })
                    }
                }
            })
            .collect()
    }

    fn substitute<'t>(&self, template: &'t str, omit_deleted: bool) -> Result<Substitution<'t>> {
        let parts = self.parse(template)?;
        let mut substitution = Substitution {
            output: String::with_capacity(template.len()),
            first_unresolved: None,
            deleted: false,
        };

        for part in &parts {
            let (raw, expression) = match part {
                Part::Literal(text) => {
                    substitution.output.push_str(text);
                    continue;
                }
                Part::Expression { raw, expression } => (*raw, expression),
            };

            let pipeline = Pipeline::new(expression)?;
            match self.evaluate(expression, &pipeline)? {
                PipelineElement::Resolved(value) => substitution.output.push_str(&value),
                PipelineElement::Deleted if omit_deleted => substitution.deleted = true,
                other => {
                    substitution.deleted |= other.is_deleted();
                    substitution.first_unresolved.get_or_insert(raw);
                    substitution.output.push_str(raw);
                }
            }
        }

        Ok(substitution)
    }

    fn evaluate(&self, expression: &Expression, pipeline: &Pipeline<'_>) -> Result<PipelineElement> {
        let reference = &expression.placeholder;

        for resolver in self.matching(&reference.prefix) {
            let first = if resolver.supports(&reference.name) {
                PipelineElement::from(resolver.resolve(&reference.name)?)
            } else {
                PipelineElement::Unresolved
            };
            let validated = resolver.is_for_validation() && first.is_resolved();
            let mut element = pipeline.execute(first.clone(), self)?;
            if validated && !element.is_deleted() {
                // stages still run so their parameters are checked
                element = first;
            }
            tracing::trace!(
                expression = %expression.source,
                result = ?element,
                "placeholder evaluated"
            );
            if element != PipelineElement::Unresolved {
                return Ok(element);
            }
        }

        Ok(PipelineElement::Unresolved)
    }
}

impl Default for ExpressionResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpressionResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionResolver")
            .field("prefixes", &self.prefixes())
            .field("max_chained_functions", &self.max_chained_functions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholders::{
        ENTITY_PLACEHOLDER, FEATURE_PLACEHOLDER, HEADERS_PLACEHOLDER, THING_PLACEHOLDER,
    };
    use twinlink_core::Headers;

    fn headers() -> Headers {
        Headers::new()
            .with("device_id", "ns:Lamp-1")
            .with("correlation-id", "c-1")
    }

    #[test]
    fn test_template_without_markers_is_unchanged() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");
        for template in ["", "plain text", "a/b/c", "single { brace }"] {
            assert_eq!(resolver.resolve(template, false).unwrap(), template);
        }
    }

    #[test]
    fn test_resolve_multiple_occurrences() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");
        assert_eq!(
            resolver
                .resolve("{{thing:namespace}}/{{ thing:name }}/{{ thing:id }}", false)
                .unwrap(),
            "ns/foo/ns:foo"
        );
    }

    #[test]
    fn test_resolvers_are_consulted_by_prefix() {
        let headers = headers();
        let resolver = ExpressionResolver::new()
            .with_placeholder(&THING_PLACEHOLDER, "ns:foo")
            .with_placeholder(&HEADERS_PLACEHOLDER, &headers);
        assert_eq!(
            resolver
                .resolve(
                    "{{ header:device_id | fn:substring-after(':') | fn:lower() }}@{{ thing:name }}",
                    false
                )
                .unwrap(),
            "lamp-1@foo"
        );
    }

    #[test]
    fn test_later_resolver_with_same_prefix_is_tried() {
        let resolver = ExpressionResolver::new()
            .with_unbound(&ENTITY_PLACEHOLDER)
            .with_placeholder(&ENTITY_PLACEHOLDER, "ns:bar");
        assert_eq!(resolver.resolve("{{ entity:name }}", false).unwrap(), "bar");
    }

    #[test]
    fn test_unresolved_fails_or_is_kept() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");
        let template = "{{ thing:name }}/{{ header:missing }}/{{ thing:unknown }}";

        let err = resolver.resolve(template, false).unwrap_err();
        assert_eq!(
            err,
            PlaceholderError::UnresolvedPlaceholder {
                placeholder: "{{ header:missing }}".to_string(),
                template: template.to_string(),
            }
        );

        assert_eq!(
            resolver.resolve(template, true).unwrap(),
            "foo/{{ header:missing }}/{{ thing:unknown }}"
        );
    }

    #[test]
    fn test_default_fills_unresolved() {
        let headers = Headers::new();
        let resolver = ExpressionResolver::new()
            .with_placeholder(&THING_PLACEHOLDER, "ns:foo")
            .with_placeholder(&HEADERS_PLACEHOLDER, &headers);
        assert_eq!(
            resolver
                .resolve("{{ header:device_id | fn:default(thing:name) }}", false)
                .unwrap(),
            "foo"
        );
        assert_eq!(
            resolver
                .resolve("{{ header:device_id | fn:default('x') | fn:upper() }}", false)
                .unwrap(),
            "X"
        );
    }

    #[test]
    fn test_prefix_without_resolver_skips_pipeline() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");
        assert!(resolver
            .resolve("{{ header:device_id | fn:default('x') }}", false)
            .is_err());
    }

    #[test]
    fn test_errors_fail_fast_without_partial_output() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");

        assert!(matches!(
            resolver.resolve("{{ thing:id }}/{{ header:x | fn:nope() }}", true),
            Err(PlaceholderError::FunctionUnknown { .. })
        ));
        assert!(matches!(
            resolver.resolve("{{ thing:id | fn:upper('x') }}", true),
            Err(PlaceholderError::FunctionSignatureInvalid { .. })
        ));
        assert!(matches!(
            resolver.resolve("{{ thing:id }}/{{ thing:id", true),
            Err(PlaceholderError::ExpressionInvalid { .. })
        ));
    }

    #[test]
    fn test_strict_thing_placeholder_rejects_invalid_source() {
        let resolver = ExpressionResolver::new()
            .with_placeholder(&THING_PLACEHOLDER, "no-namespace")
            .with_placeholder(&FEATURE_PLACEHOLDER, "no-namespace");
        assert!(matches!(
            resolver.resolve("{{ thing:id }}", true),
            Err(PlaceholderError::ThingIdInvalid(_))
        ));
        // the lenient placeholders resolve nothing instead
        assert_eq!(
            resolver.resolve("{{ feature:id }}", true).unwrap(),
            "{{ feature:id }}"
        );
    }

    #[test]
    fn test_chain_bound_is_configurable() {
        let resolver = ExpressionResolver::new()
            .with_placeholder(&THING_PLACEHOLDER, "ns:foo")
            .with_max_chained_functions(2);
        assert_eq!(
            resolver
                .resolve("{{ thing:name | fn:upper() | fn:lower() }}", false)
                .unwrap(),
            "foo"
        );
        assert_eq!(
            resolver.resolve("{{ thing:name | fn:upper() | fn:lower() | fn:upper() }}", false),
            Err(PlaceholderError::FunctionChainTooComplex {
                expression: "thing:name | fn:upper() | fn:lower() | fn:upper()".to_string(),
                max: 2,
            })
        );

        let configured = ExpressionResolver::new()
            .with_config(&PlaceholderConfig::default().with_max_chained_functions(1));
        assert_eq!(configured.max_chained_functions(), 1);
    }

    #[test]
    fn test_zero_chain_bound_is_raised() {
        let resolver = ExpressionResolver::new()
            .with_placeholder(&THING_PLACEHOLDER, "ns:foo")
            .with_max_chained_functions(0);
        assert_eq!(resolver.max_chained_functions(), MIN_CHAINED_FUNCTIONS);
        assert_eq!(resolver.resolve("{{ thing:name | fn:upper() }}", false).unwrap(), "FOO");

        let configured = ExpressionResolver::new().with_config(&PlaceholderConfig {
            max_chained_functions: 0,
        });
        assert_eq!(configured.max_chained_functions(), MIN_CHAINED_FUNCTIONS);
    }

    #[test]
    fn test_validation_keeps_replacement_through_stages() {
        let resolver = ExpressionResolver::new().with_validation(&THING_PLACEHOLDER, "X");
        for template in [
            "{{ thing:id | fn:substring-before(':') }}",
            "{{ thing:id | fn:substring-after(':') | fn:upper() }}",
            "{{ thing:id | fn:base64-decode() }}",
            "{{ thing:id | fn:url-decode() }}",
            "{{ thing:id | fn:default('y') }}",
        ] {
            assert_eq!(resolver.resolve(template, false).unwrap(), "X", "{}", template);
        }
        assert!(matches!(
            resolver.resolve("{{ thing:id | fn:substring-before(thing:id) }}", false),
            Err(PlaceholderError::FunctionSignatureInvalid { .. })
        ));
        assert_eq!(
            resolver
                .resolve_as_element("{{ thing:id | fn:delete() }}")
                .unwrap(),
            PipelineElement::Deleted
        );
    }

    #[test]
    fn test_resolve_as_element() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");
        assert_eq!(
            resolver.resolve_as_element("a/{{ thing:name }}").unwrap(),
            PipelineElement::resolved("a/foo")
        );
        assert_eq!(
            resolver.resolve_as_element("{{ thing:bogus }}").unwrap(),
            PipelineElement::Unresolved
        );
        assert_eq!(
            resolver
                .resolve_as_element("{{ thing:bogus }}{{ thing:name | fn:delete() }}")
                .unwrap(),
            PipelineElement::Deleted
        );
    }

    #[test]
    fn test_deleted_counts_as_unresolved() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");
        assert!(matches!(
            resolver.resolve("{{ thing:name | fn:delete() }}", false),
            Err(PlaceholderError::UnresolvedPlaceholder { .. })
        ));
    }

    #[test]
    fn test_deleted_can_be_omitted() {
        let resolver = ExpressionResolver::new().with_placeholder(&THING_PLACEHOLDER, "ns:foo");
        assert_eq!(
            resolver
                .resolve_omitting_deleted("a{{ thing:name | fn:delete() }}/{{ thing:name }}", false)
                .unwrap(),
            "a/foo"
        );
    }

    #[test]
    fn test_resolve_single_placeholder() {
        let headers = headers();
        let resolver = ExpressionResolver::new()
            .with_placeholder(&THING_PLACEHOLDER, "ns:foo")
            .with_placeholder(&HEADERS_PLACEHOLDER, &headers);

        assert_eq!(
            resolver.resolve_single_placeholder("thing:name").unwrap().as_deref(),
            Some("foo")
        );
        assert_eq!(
            resolver
                .resolve_single_placeholder(" header:Correlation-ID | fn:upper() ")
                .unwrap()
                .as_deref(),
            Some("C-1")
        );
        assert_eq!(resolver.resolve_single_placeholder("thing:bogus").unwrap(), None);
        assert_eq!(resolver.resolve_single_placeholder("topic:full").unwrap(), None);
        assert!(resolver.resolve_single_placeholder("no-prefix").is_err());
    }

    #[test]
    fn test_debug_lists_prefixes() {
        let resolver = ExpressionResolver::new()
            .with_unbound(&THING_PLACEHOLDER)
            .with_validation(&HEADERS_PLACEHOLDER, "x");
        let debug = format!("{:?}", resolver);
        assert!(debug.contains("\"thing\""));
        assert!(debug.contains("\"header\""));
    }
}
