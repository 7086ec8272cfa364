//! Error types for placeholder resolution and enforcement.

use twinlink_core::{Error as CoreError, Headers, IdError};

/// Result type for placeholder operations.
pub type Result<T> = std::result::Result<T, PlaceholderError>;

/// Errors raised while parsing, resolving or enforcing placeholder templates.
///
/// None of these are retryable: the same input always yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceholderError {
    /// A placeholder was left unresolved after every resolver was consulted.
    #[error("The placeholder '{placeholder}' could not be resolved in '{template}'")]
    UnresolvedPlaceholder {
        placeholder: String,
        template: String,
    },

    /// A pipeline stage names a function that does not exist.
    #[error("The function 'fn:{name}' used in '{expression}' is unknown")]
    FunctionUnknown { name: String, expression: String },

    /// A function was called with parameters not matching its signature.
    #[error(
        "The function 'fn:{name}' was called with invalid parameters '({params})'. \
         Expected signature: {signature}"
    )]
    FunctionSignatureInvalid {
        name: String,
        params: String,
        signature: String,
    },

    /// Too many chained functions or too deeply nested parentheses.
    #[error("The expression '{expression}' is too complex: at most {max} chained functions are allowed")]
    FunctionChainTooComplex { expression: String, max: usize },

    /// The content between the placeholder markers is malformed.
    #[error("The expression '{expression}' is invalid: {reason}")]
    ExpressionInvalid { expression: String, reason: String },

    /// The source of the strict thing placeholder is not a valid thing id.
    #[error("Invalid thing id: {0}")]
    ThingIdInvalid(#[from] IdError),

    /// The identity claimed by a message matches none of the configured filters.
    #[error("The input '{input}' does not match any of the configured filters {filters:?}")]
    EnforcementMismatch {
        input: String,
        filters: Vec<String>,
        headers: Headers,
    },
}

impl PlaceholderError {
    pub(crate) fn invalid_expression(expression: &str, reason: impl Into<String>) -> Self {
        PlaceholderError::ExpressionInvalid {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable, machine readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            PlaceholderError::UnresolvedPlaceholder { .. } => "placeholder:placeholder.unresolved",
            PlaceholderError::FunctionUnknown { .. } => "placeholder:placeholder.function.unknown",
            PlaceholderError::FunctionSignatureInvalid { .. } => {
                "placeholder:placeholder.function.signature.invalid"
            }
            PlaceholderError::FunctionChainTooComplex { .. } => {
                "placeholder:placeholder.function.toocomplex"
            }
            PlaceholderError::ExpressionInvalid { .. } => "placeholder:placeholder.expression.invalid",
            PlaceholderError::ThingIdInvalid(_) => "things:id.invalid",
            PlaceholderError::EnforcementMismatch { .. } => {
                "connectivity:connection.id.enforcement.failed"
            }
        }
    }

    /// HTTP-like status the error maps to.
    pub fn status(&self) -> u16 {
        match self {
            PlaceholderError::EnforcementMismatch { .. } => 403,
            _ => 400,
        }
    }

    /// Headers of the message that failed enforcement, if any.
    pub fn headers(&self) -> Option<&Headers> {
        match self {
            PlaceholderError::EnforcementMismatch { headers, .. } => Some(headers),
            _ => None,
        }
    }
}

impl From<PlaceholderError> for CoreError {
    fn from(err: PlaceholderError) -> Self {
        match err {
            PlaceholderError::ThingIdInvalid(e) => CoreError::Id(e),
            PlaceholderError::EnforcementMismatch { ref headers, .. } => CoreError::Enforcement {
                correlation_id: headers.correlation_id().map(str::to_string),
                message: err.to_string(),
            },
            other => CoreError::Placeholder {
                code: other.error_code().to_string(),
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_error_message_contains_signature() {
        let err = PlaceholderError::FunctionSignatureInvalid {
            name: "upper".to_string(),
            params: "'x'".to_string(),
            signature: "fn:upper()".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fn:upper()"));
        assert!(msg.contains("'x'"));
    }

    #[test]
    fn test_enforcement_error_converts_with_correlation_id() {
        let err = PlaceholderError::EnforcementMismatch {
            input: "bar".to_string(),
            filters: vec!["foo".to_string()],
            headers: Headers::new().with("correlation-id", "c-42"),
        };
        assert_eq!(err.status(), 403);
        assert!(err.headers().is_some());

        match CoreError::from(err) {
            CoreError::Enforcement { correlation_id, .. } => {
                assert_eq!(correlation_id.as_deref(), Some("c-42"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_converts_to_placeholder_error() {
        let err = PlaceholderError::UnresolvedPlaceholder {
            placeholder: "{{ thing:foo }}".to_string(),
            template: "{{ thing:foo }}".to_string(),
        };
        let core = CoreError::from(err);
        assert_eq!(core.code(), "placeholder:placeholder.unresolved");
        assert_eq!(core.status(), 400);
    }
}
