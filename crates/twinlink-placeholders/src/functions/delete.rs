//! `fn:delete()`

use super::{expect_no_parameters, PipelineFunction};
use crate::element::PipelineElement;
use crate::error::Result;
use crate::expression::ExpressionResolver;
use crate::signature::FunctionSignature;

static SIGNATURE: FunctionSignature = FunctionSignature::new("delete", &[]);

/// Marks the value as deleted, whatever the input was.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteFunction;

impl PipelineFunction for DeleteFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &SIGNATURE
    }

    fn apply(
        &self,
        _input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&SIGNATURE, params)?;
        Ok(PipelineElement::Deleted)
    }
}
