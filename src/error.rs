use crate::path::PathError;

/// Build-phase failures of a [`ContextTree`](crate::ContextTree).
///
/// Lookups never produce these; they report [`PathError`] or an empty match
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("a context is already registered for {pattern:?}")]
    Conflict { pattern: Box<str> },

    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("failed to allocate {what}")]
    AllocationFailure { what: &'static str },

    #[error("invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: Box<str>,
        source: regex::Error,
    },

    #[error("the location root is already set to {current:?}")]
    RootLocationAlreadySet { current: Box<str> },
}

impl TreeError {
    pub(crate) fn conflict(pattern: &str) -> Self {
        Self::Conflict {
            pattern: pattern.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
