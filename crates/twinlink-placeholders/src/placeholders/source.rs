//! `source:` placeholder.

use super::Placeholder;
use crate::error::Result;

/// Resolves `source:address` to the address a message was consumed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceAddressPlaceholder;

pub static SOURCE_ADDRESS_PLACEHOLDER: SourceAddressPlaceholder = SourceAddressPlaceholder;

impl Placeholder for SourceAddressPlaceholder {
    type Source = str;

    fn prefix(&self) -> &'static str {
        "source"
    }

    fn supported_names(&self) -> &'static [&'static str] {
        &["address"]
    }

    fn resolve(&self, source: &str, name: &str) -> Result<Option<String>> {
        Ok((name == "address").then(|| source.to_string()))
    }
}
