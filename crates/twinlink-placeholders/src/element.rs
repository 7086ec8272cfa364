//! The value carried through a placeholder pipeline.

/// Outcome of resolving a placeholder or applying one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineElement {
    /// A value is available.
    Resolved(String),
    /// No value could be determined.
    #[default]
    Unresolved,
    /// The value was explicitly removed, e.g. by `fn:delete()`.
    Deleted,
}

impl PipelineElement {
    pub fn resolved(value: impl Into<String>) -> Self {
        PipelineElement::Resolved(value.into())
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PipelineElement::Resolved(_))
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, PipelineElement::Deleted)
    }

    pub fn as_resolved(&self) -> Option<&str> {
        match self {
            PipelineElement::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Transform a resolved value; unresolved and deleted pass through.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        match self {
            PipelineElement::Resolved(value) => PipelineElement::Resolved(f(value)),
            other => other,
        }
    }

    /// Like [`map`](Self::map), but the transformation may itself fail to
    /// produce a value.
    pub fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> PipelineElement,
    {
        match self {
            PipelineElement::Resolved(value) => f(value),
            other => other,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            PipelineElement::Resolved(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Option<String>> for PipelineElement {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => PipelineElement::Resolved(value),
            None => PipelineElement::Unresolved,
        }
    }
}
