//! Error types for build-time and registration failures
//!
//! Per-request outcomes (ambiguous, unsupported, ...) are not errors; they are
//! reported as [`Classification`](crate::Classification) values.

use thiserror::Error;

/// Errors raised while parsing versions, building conventions or
/// registering sunset policies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersioningError {
    /// A version token does not match `{major}.{minor}[-{status}]`.
    #[error("invalid API version format: '{token}'")]
    InvalidFormat {
        /// The offending token, untrimmed.
        token: String,
    },

    /// The declared conventions cannot produce a usable model.
    #[error("invalid convention for '{group}': {reason}")]
    InvalidConvention {
        /// Group the convention was declared on.
        group: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A sunset policy was registered twice for the same key.
    #[error("a sunset policy is already registered for {key}")]
    DuplicateKey {
        /// Display form of the `(name, version)` key.
        key: String,
    },

    /// The conventions were already frozen and can no longer change.
    #[error("the API version model has already been frozen")]
    FrozenModel,
}

impl VersioningError {
    pub(crate) fn invalid_format(token: impl Into<String>) -> Self {
        Self::InvalidFormat {
            token: token.into(),
        }
    }

    pub(crate) fn invalid_convention(group: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConvention {
            group: group.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for versioning operations
pub type Result<T, E = VersioningError> = std::result::Result<T, E>;
