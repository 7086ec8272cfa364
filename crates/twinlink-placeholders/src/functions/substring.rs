//! `fn:substring-before(separator)` and `fn:substring-after(separator)`

use super::{expect_literals, PipelineFunction};
use crate::element::PipelineElement;
use crate::error::Result;
use crate::expression::ExpressionResolver;
use crate::signature::{FunctionSignature, ParameterDefinition};

static PARAMETERS: [ParameterDefinition; 1] = [ParameterDefinition::string(
    "givenString",
    "quoted separator to search for",
)];

static BEFORE_SIGNATURE: FunctionSignature =
    FunctionSignature::new("substring-before", &PARAMETERS);

static AFTER_SIGNATURE: FunctionSignature = FunctionSignature::new("substring-after", &PARAMETERS);

/// Text before the first occurrence of the separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringBeforeFunction;

impl PipelineFunction for SubstringBeforeFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &BEFORE_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        let [separator] = expect_literals::<1>(&BEFORE_SIGNATURE, params)?;
        Ok(input.and_then(|value| match value.find(separator.as_str()) {
            Some(index) => PipelineElement::Resolved(value[..index].to_string()),
            None => PipelineElement::Unresolved,
        }))
    }
}

/// Text after the first occurrence of the separator.
///
/// Only the first character of the separator is skipped, so a multi
/// character separator leaves its remaining characters in the result:
/// `substring-after('::')` on `a::b` yields `:b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringAfterFunction;

impl PipelineFunction for SubstringAfterFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &AFTER_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        let [separator] = expect_literals::<1>(&AFTER_SIGNATURE, params)?;
        Ok(input.and_then(|value| match value.find(separator.as_str()) {
            Some(index) => {
                let skip = value[index..].chars().next().map_or(0, char::len_utf8);
                PipelineElement::Resolved(value[index + skip..].to_string())
            }
            None => PipelineElement::Unresolved,
        }))
    }
}
