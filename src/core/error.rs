//! Error types for loader operations.

use thiserror::Error;

/// Errors produced by the loading scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// A locator or related origin could not be parsed into a tuple origin.
    #[error("malformed locator `{locator}`: {reason}")]
    MalformedLocator {
        /// Offending input.
        locator: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// The document reported a load/error event failure for the resource.
    #[error("failed to attach `{locator}`: {reason}")]
    AttachFailed {
        /// Resource that failed.
        locator: String,
        /// Failure reported by the host.
        reason: String,
    },
    /// Loader configuration is invalid.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl LoaderError {
    /// Build a `MalformedLocator` error.
    pub fn malformed(locator: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedLocator {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an `AttachFailed` error.
    pub fn attach_failed(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AttachFailed {
            locator: locator.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type LoaderResult<T> = Result<T, LoaderError>;
