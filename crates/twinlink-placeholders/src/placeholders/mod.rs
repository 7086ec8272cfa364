//! Placeholder catalog.
//!
//! A placeholder maps `prefix:name` plus a source value to a string. Every
//! implementation is a stateless unit struct with a `static` instance;
//! chains of placeholders are registered explicitly per usage context.

mod entity;
mod headers;
mod source;
mod topic;

pub use entity::{
    ConnectionPlaceholder, EntityPlaceholder, FeaturePlaceholder, PolicyPlaceholder,
    ThingPlaceholder, CONNECTION_PLACEHOLDER, ENTITY_PLACEHOLDER, FEATURE_PLACEHOLDER,
    POLICY_PLACEHOLDER, THING_PLACEHOLDER,
};
pub use headers::{HeadersPlaceholder, HEADERS_PLACEHOLDER};
pub use source::{SourceAddressPlaceholder, SOURCE_ADDRESS_PLACEHOLDER};
pub use topic::{TopicPathPlaceholder, TOPIC_PLACEHOLDER};

use crate::error::Result;
use crate::resolver::{PlaceholderResolver, Resolver};

/// Resolves `prefix:name` references against a source value.
pub trait Placeholder: Send + Sync {
    /// Value the placeholder reads from, e.g. a thing id or the headers.
    type Source: ?Sized;

    /// Prefix before the `:` in a reference, e.g. `thing`.
    fn prefix(&self) -> &'static str;

    /// Names this placeholder knows about.
    fn supported_names(&self) -> &'static [&'static str];

    fn supports(&self, name: &str) -> bool {
        self.supported_names().contains(&name)
    }

    /// Resolve `name` against `source`.
    ///
    /// Unknown names resolve to `None`. Only placeholders with a strict
    /// source format return errors.
    fn resolve(&self, source: &Self::Source, name: &str) -> Result<Option<String>>;
}

/// Source-independent view of a placeholder, so placeholders over
/// different source types can be listed together for validation.
pub trait AnyPlaceholder: Send + Sync {
    /// A resolver yielding `replacement` for every supported name.
    fn validation_resolver<'a>(&'a self, replacement: &'a str) -> Box<dyn Resolver + 'a>;
}

impl<P: Placeholder> AnyPlaceholder for P {
    fn validation_resolver<'a>(&'a self, replacement: &'a str) -> Box<dyn Resolver + 'a> {
        Box::new(PlaceholderResolver::for_validation_with(self, replacement))
    }
}

/// Placeholders available in connection configuration (addresses, header
/// mappings, enforcement).
pub static CONNECTIVITY_PLACEHOLDERS: &[&dyn AnyPlaceholder] = &[
    &THING_PLACEHOLDER,
    &ENTITY_PLACEHOLDER,
    &FEATURE_PLACEHOLDER,
    &CONNECTION_PLACEHOLDER,
    &HEADERS_PLACEHOLDER,
    &TOPIC_PLACEHOLDER,
    &SOURCE_ADDRESS_PLACEHOLDER,
];

/// Placeholders available in policy subjects and resources.
pub static POLICY_PLACEHOLDERS: &[&dyn AnyPlaceholder] = &[
    &POLICY_PLACEHOLDER,
    &ENTITY_PLACEHOLDER,
    &HEADERS_PLACEHOLDER,
];

/// Placeholders resolved against the id of the addressed thing when
/// matching enforcement filters.
pub static THING_FILTER_PLACEHOLDERS: &[&dyn Placeholder<Source = str>] =
    &[&THING_PLACEHOLDER, &ENTITY_PLACEHOLDER];
