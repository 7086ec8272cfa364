//! `fn:default(value)`

use super::PipelineFunction;
use crate::element::PipelineElement;
use crate::error::Result;
use crate::expression::ExpressionResolver;
use crate::parser::{parse_arguments, Argument};
use crate::signature::{FunctionSignature, ParameterDefinition};

static PARAMETERS: [ParameterDefinition; 1] = [ParameterDefinition::string(
    "defaultValue",
    "quoted constant or placeholder reference used when the input is unresolved",
)];

static SIGNATURE: FunctionSignature = FunctionSignature::new("default", &PARAMETERS);

/// Substitutes a value for an unresolved input.
///
/// The argument is only parsed when it is needed. A placeholder reference
/// that cannot be resolved falls back to its own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFunction;

impl PipelineFunction for DefaultFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        if input != PipelineElement::Unresolved {
            return Ok(input);
        }

        let argument = match parse_arguments(params).as_deref() {
            Some([argument]) => argument.clone(),
            _ => return Err(SIGNATURE.invalid_call(params)),
        };

        let value = match argument {
            Argument::Literal(value) => value,
            Argument::Reference(reference) => resolver
                .resolve_reference(&reference)?
                .unwrap_or_else(|| reference.to_string()),
        };
        Ok(PipelineElement::Resolved(value))
    }
}
