//! Identity enforcement for inbound messages.
//!
//! A connection may require that the identity a device claims on the
//! transport (a header value, a topic segment) is the identity of the thing
//! the message addresses. The claimed identity is resolved from the
//! configured input template; the addressed identity from the filter
//! templates.

use crate::element::PipelineElement;
use crate::error::{PlaceholderError, Result};
use crate::expression::{env_config, ExpressionResolver};
use crate::placeholders::{Placeholder, THING_FILTER_PLACEHOLDERS};
use crate::resolver::PlaceholderResolver;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use twinlink_core::config::PlaceholderConfig;
use twinlink_core::Headers;

/// Enforcement section of a connection source.
///
/// ```json
/// { "input": "{{ header:device_id }}", "filters": ["{{ thing:name }}"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementConfig {
    /// Template resolved against the inbound message.
    pub input: String,
    /// Templates resolved against the addressed entity; one must match.
    pub filters: BTreeSet<String>,
}

impl EnforcementConfig {
    pub fn new<I, F>(input: impl Into<String>, filters: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            input: input.into(),
            filters: filters.into_iter().map(Into::into).collect(),
        }
    }
}

/// Creates an [`EnforcementFilter`] per inbound message.
///
/// `I` is the source of the input placeholder, e.g. the message headers;
/// `M` the source the filter placeholders resolve against, e.g. the
/// addressed thing id.
pub struct EnforcementFilterFactory<'p, I: ?Sized, M: ?Sized> {
    config: EnforcementConfig,
    placeholder_config: PlaceholderConfig,
    input_placeholder: &'p dyn Placeholder<Source = I>,
    filter_placeholders: &'p [&'p dyn Placeholder<Source = M>],
}

impl<'p, I: ?Sized> EnforcementFilterFactory<'p, I, str> {
    /// A factory whose filters resolve against the addressed thing id.
    pub fn for_things(config: EnforcementConfig, input_placeholder: &'p dyn Placeholder<Source = I>) -> Self {
        Self::new(config, input_placeholder, THING_FILTER_PLACEHOLDERS)
    }
}

impl<'p, I: ?Sized, M: ?Sized> EnforcementFilterFactory<'p, I, M> {
    pub fn new(
        config: EnforcementConfig,
        input_placeholder: &'p dyn Placeholder<Source = I>,
        filter_placeholders: &'p [&'p dyn Placeholder<Source = M>],
    ) -> Self {
        Self {
            config,
            placeholder_config: env_config().clone(),
            input_placeholder,
            filter_placeholders,
        }
    }

    /// Resolve templates with the chain bound of `config` instead of the
    /// environment default.
    pub fn with_placeholder_config(mut self, config: &PlaceholderConfig) -> Self {
        self.placeholder_config = config.clone();
        self
    }

    pub fn config(&self) -> &EnforcementConfig {
        &self.config
    }

    fn resolver<'r>(&self) -> ExpressionResolver<'r> {
        ExpressionResolver::new().with_config(&self.placeholder_config)
    }

    /// Check the configured templates without data: the input may only use
    /// the input placeholder, the filters only the filter placeholders.
    pub fn validate(&self) -> Result<()> {
        self.resolver()
            .with_resolver(PlaceholderResolver::for_validation(self.input_placeholder))
            .resolve(&self.config.input, false)?;

        let filter_resolver = self
            .filter_placeholders
            .iter()
            .fold(self.resolver(), |resolver, placeholder| {
                resolver.with_resolver(PlaceholderResolver::for_validation(*placeholder))
            });
        for filter in &self.config.filters {
            filter_resolver.resolve(filter, false)?;
        }
        Ok(())
    }

    /// Resolve the input template against `input`.
    ///
    /// Fails when the input cannot be resolved, e.g. because the header the
    /// template refers to is missing.
    pub fn get_filter(&self, input: &I) -> Result<EnforcementFilter<'_, M>> {
        let resolved_input = self
            .resolver()
            .with_placeholder(self.input_placeholder, input)
            .resolve(&self.config.input, false)?;

        tracing::trace!(input = %resolved_input, "enforcement input resolved");
        Ok(EnforcementFilter {
            config: &self.config,
            placeholder_config: &self.placeholder_config,
            filter_placeholders: self.filter_placeholders,
            resolved_input,
        })
    }
}

/// Enforcement check for one inbound message.
pub struct EnforcementFilter<'f, M: ?Sized> {
    config: &'f EnforcementConfig,
    placeholder_config: &'f PlaceholderConfig,
    filter_placeholders: &'f [&'f dyn Placeholder<Source = M>],
    resolved_input: String,
}

impl<M: ?Sized> EnforcementFilter<'_, M> {
    pub fn resolved_input(&self) -> &str {
        &self.resolved_input
    }

    /// Succeeds if the resolved input equals at least one filter resolved
    /// against `filter_input`. Filters that resolve to no value never match.
    ///
    /// Fails with `EnforcementMismatch`, carrying `headers`, otherwise.
    /// Malformed filters and invalid strict sources fail with their own error.
    pub fn matches(&self, filter_input: &M, headers: &Headers) -> Result<()> {
        let resolver = self.filter_placeholders.iter().fold(
            ExpressionResolver::new().with_config(self.placeholder_config),
            |resolver, placeholder| resolver.with_placeholder(*placeholder, filter_input),
        );

        let mut resolved_filters = Vec::with_capacity(self.config.filters.len());
        for filter in &self.config.filters {
            match resolver.resolve_as_element(filter)? {
                PipelineElement::Resolved(resolved) if resolved == self.resolved_input => {
                    tracing::trace!(input = %self.resolved_input, filter = %filter, "enforcement matched");
                    return Ok(());
                }
                PipelineElement::Resolved(resolved) => resolved_filters.push(resolved),
                other => tracing::trace!(filter = %filter, result = ?other, "enforcement filter skipped"),
            }
        }

        tracing::debug!(
            input = %self.resolved_input,
            filters = ?resolved_filters,
            correlation_id = headers.correlation_id().unwrap_or_default(),
            "enforcement mismatch"
        );
        Err(PlaceholderError::EnforcementMismatch {
            input: self.resolved_input.clone(),
            filters: resolved_filters,
            headers: headers.clone(),
        })
    }
}
