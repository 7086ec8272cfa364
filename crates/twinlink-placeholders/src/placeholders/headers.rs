//! `header:` placeholder.

use super::Placeholder;
use crate::error::Result;
use twinlink_core::HeaderLookup;

/// Resolves any header name against the headers of a message.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadersPlaceholder;

pub static HEADERS_PLACEHOLDER: HeadersPlaceholder = HeadersPlaceholder;

impl Placeholder for HeadersPlaceholder {
    type Source = dyn HeaderLookup;

    fn prefix(&self) -> &'static str {
        "header"
    }

    fn supported_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn supports(&self, name: &str) -> bool {
        !name.is_empty()
    }

    fn resolve(&self, source: &dyn HeaderLookup, name: &str) -> Result<Option<String>> {
        Ok(source.header(name).map(str::to_string))
    }
}
