//! Pipeline function catalog.
//!
//! Functions are chained after the placeholder reference of an expression:
//!
//! ```text
//! {{ header:device-id | fn:substring-after(':') | fn:default(thing:name) | fn:lower() }}
//! ```
//!
//! Each function validates its own raw parameter text against its
//! [`FunctionSignature`].

mod default;
mod delete;
mod encoding;
mod substring;
mod text;

pub use default::DefaultFunction;
pub use delete::DeleteFunction;
pub use encoding::{Base64DecodeFunction, Base64EncodeFunction, UrlDecodeFunction, UrlEncodeFunction};
pub use substring::{SubstringAfterFunction, SubstringBeforeFunction};
pub use text::{LowerFunction, ReplaceFunction, TrimFunction, UpperFunction};

use crate::element::PipelineElement;
use crate::error::Result;
use crate::expression::ExpressionResolver;
use crate::parser::{parse_arguments, Argument};
use crate::signature::FunctionSignature;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// A chainable transformation applied to a [`PipelineElement`].
pub trait PipelineFunction: Send + Sync {
    fn signature(&self) -> &'static FunctionSignature;

    fn name(&self) -> &'static str {
        self.signature().name
    }

    /// Apply the function to the output of the previous stage.
    ///
    /// `params` is the raw text between the parentheses; `resolver` resolves
    /// placeholder references used as arguments.
    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement>;
}

static CATALOG: Lazy<BTreeMap<&'static str, &'static dyn PipelineFunction>> = Lazy::new(|| {
    let functions: [&'static dyn PipelineFunction; 12] = [
        &DefaultFunction,
        &SubstringBeforeFunction,
        &SubstringAfterFunction,
        &UpperFunction,
        &LowerFunction,
        &TrimFunction,
        &ReplaceFunction,
        &DeleteFunction,
        &UrlEncodeFunction,
        &UrlDecodeFunction,
        &Base64EncodeFunction,
        &Base64DecodeFunction,
    ];
    functions.into_iter().map(|f| (f.name(), f)).collect()
});

/// Look up a function by name, without the `fn:` prefix.
pub fn find(name: &str) -> Option<&'static dyn PipelineFunction> {
    CATALOG.get(name).copied()
}

/// All known functions, ordered by name.
pub fn catalog() -> impl Iterator<Item = &'static dyn PipelineFunction> {
    CATALOG.values().copied()
}

/// Reject any parameter text that is not an empty list.
pub(crate) fn expect_no_parameters(signature: &FunctionSignature, params: &str) -> Result<()> {
    if params.trim().is_empty() {
        Ok(())
    } else {
        Err(signature.invalid_call(params))
    }
}

/// Parse exactly `N` quoted string constants.
pub(crate) fn expect_literals<const N: usize>(
    signature: &FunctionSignature,
    params: &str,
) -> Result<[String; N]> {
    let literals = parse_arguments(params).and_then(|arguments| {
        arguments
            .into_iter()
            .map(|argument| match argument {
                Argument::Literal(value) => Some(value),
                Argument::Reference(_) => None,
            })
            .collect::<Option<Vec<_>>>()
    });

    literals
        .and_then(|values| <[String; N]>::try_from(values).ok())
        .ok_or_else(|| signature.invalid_call(params))
}
