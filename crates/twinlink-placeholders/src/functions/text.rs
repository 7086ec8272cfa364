//! Case conversion, trimming and replacement.

use super::{expect_literals, expect_no_parameters, PipelineFunction};
use crate::element::PipelineElement;
use crate::error::Result;
use crate::expression::ExpressionResolver;
use crate::signature::{FunctionSignature, ParameterDefinition};

static UPPER_SIGNATURE: FunctionSignature = FunctionSignature::new("upper", &[]);
static LOWER_SIGNATURE: FunctionSignature = FunctionSignature::new("lower", &[]);
static TRIM_SIGNATURE: FunctionSignature = FunctionSignature::new("trim", &[]);

static REPLACE_PARAMETERS: [ParameterDefinition; 2] = [
    ParameterDefinition::string("from", "quoted text to replace, must not be empty"),
    ParameterDefinition::string("to", "quoted replacement text"),
];
static REPLACE_SIGNATURE: FunctionSignature =
    FunctionSignature::new("replace", &REPLACE_PARAMETERS);

/// `fn:upper()`
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperFunction;

impl PipelineFunction for UpperFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &UPPER_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&UPPER_SIGNATURE, params)?;
        Ok(input.map(|value| value.to_uppercase()))
    }
}

/// `fn:lower()`
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerFunction;

impl PipelineFunction for LowerFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &LOWER_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&LOWER_SIGNATURE, params)?;
        Ok(input.map(|value| value.to_lowercase()))
    }
}

/// `fn:trim()`
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimFunction;

impl PipelineFunction for TrimFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &TRIM_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&TRIM_SIGNATURE, params)?;
        Ok(input.map(|value| value.trim().to_string()))
    }
}

/// `fn:replace(from, to)`, replacing every occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceFunction;

impl PipelineFunction for ReplaceFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &REPLACE_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        let [from, to] = expect_literals::<2>(&REPLACE_SIGNATURE, params)?;
        if from.is_empty() {
            return Err(REPLACE_SIGNATURE.invalid_call(params));
        }
        Ok(input.map(|value| value.replace(&from, &to)))
    }
}
