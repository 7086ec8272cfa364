//! Execution of the function stages of an expression.

use crate::element::PipelineElement;
use crate::error::{PlaceholderError, Result};
use crate::expression::ExpressionResolver;
use crate::functions::{self, PipelineFunction};
use crate::parser::Expression;

/// The function stages of one parsed expression, looked up in the catalog.
pub struct Pipeline<'e> {
    stages: Vec<(&'static dyn PipelineFunction, &'e str)>,
}

impl<'e> Pipeline<'e> {
    /// Look up every stage of `expression`.
    ///
    /// Fails with `FunctionUnknown` on the first name missing from the
    /// catalog, before anything is resolved.
    pub fn new(expression: &'e Expression) -> Result<Self> {
        let stages = expression
            .functions
            .iter()
            .map(|call| {
                functions::find(&call.name)
                    .map(|function| (function, call.params.as_str()))
                    .ok_or_else(|| PlaceholderError::FunctionUnknown {
                        name: call.name.clone(),
                        expression: expression.source.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Feed `first` through every stage in order.
    pub fn execute(
        &self,
        first: PipelineElement,
        resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        self.stages
            .iter()
            .try_fold(first, |element, (function, params)| {
                let next = function.apply(element, params, resolver)?;
                tracing::trace!(function = function.name(), result = ?next, "pipeline stage applied");
                Ok(next)
            })
    }
}
