//! Error types shared across the Twinlink crates.

use crate::id::IdError;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by Twinlink components.
///
/// Component crates keep their own error enums and convert into this one at
/// the boundary, so callers outside the engine only deal with a single type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An entity id could not be parsed.
    #[error("Invalid entity id: {0}")]
    Id(#[from] IdError),

    /// A topic path could not be parsed.
    #[error("Invalid topic path: {0}")]
    TopicPath(String),

    /// A placeholder template could not be resolved or validated.
    #[error("{message}")]
    Placeholder {
        code: String,
        status: u16,
        message: String,
    },

    /// The identity claimed by a message did not match the addressed entity.
    #[error("{message}")]
    Enforcement {
        message: String,
        correlation_id: Option<String>,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Other error.
    #[error("Other: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Stable, machine readable error code.
    pub fn code(&self) -> &str {
        match self {
            Error::Id(_) => "things:id.invalid",
            Error::TopicPath(_) => "things:topic.invalid",
            Error::Placeholder { code, .. } => code,
            Error::Enforcement { .. } => "connectivity:connection.id.enforcement.failed",
            Error::InvalidConfiguration(_) => "connectivity:connection.configuration.invalid",
            Error::Other(_) => "internal:error",
        }
    }

    /// HTTP-like status the error maps to.
    pub fn status(&self) -> u16 {
        match self {
            Error::Id(_) | Error::TopicPath(_) | Error::InvalidConfiguration(_) => 400,
            Error::Placeholder { status, .. } => *status,
            Error::Enforcement { .. } => 403,
            Error::Other(_) => 500,
        }
    }
}

/// Error payload returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        let response = ErrorResponse::new(err.status(), err.code(), err.to_string());
        match err {
            Error::Enforcement {
                correlation_id: Some(id),
                ..
            } => response.with_correlation_id(id.clone()),
            _ => response,
        }
    }
}

impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        ErrorResponse::from(&err)
    }
}
