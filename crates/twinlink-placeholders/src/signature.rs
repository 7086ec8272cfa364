//! Function signatures, used for validation and error messages.

use crate::error::PlaceholderError;
use crate::parser::FUNCTION_PREFIX;
use std::fmt;

/// One declared parameter of a pipeline function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub type_name: &'static str,
    pub description: &'static str,
}

impl ParameterDefinition {
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            type_name: "String",
            description,
        }
    }
}

/// Name and ordered parameters of a pipeline function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub parameters: &'static [ParameterDefinition],
}

impl FunctionSignature {
    pub const fn new(name: &'static str, parameters: &'static [ParameterDefinition]) -> Self {
        Self { name, parameters }
    }

    /// Error for a call whose parameter text does not fit this signature.
    pub fn invalid_call(&self, params: &str) -> PlaceholderError {
        PlaceholderError::FunctionSignatureInvalid {
            name: self.name.to_string(),
            params: params.trim().to_string(),
            signature: self.describe(),
        }
    }

    /// The signature followed by a description of every parameter.
    pub fn describe(&self) -> String {
        let mut out = self.to_string();
        for parameter in self.parameters {
            out.push_str(&format!(
                " - {} ({}): {}",
                parameter.name, parameter.type_name, parameter.description
            ));
        }
        out
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.type_name))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}:{}({})", FUNCTION_PREFIX, self.name, parameters)
    }
}
