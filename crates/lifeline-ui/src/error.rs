//! Error types for the portal UI
//!
//! Three concerns, three enums:
//! - [`UiError`]: DOM, navigation and configuration failures inside the UI core
//! - [`ServiceError`]: failures reported by a [`DataService`](crate::service::DataService)
//! - [`ValidationError`]: user input rejected before any service call
//!
//! Missing DOM collaborators are not errors at all: lookups return `Option`
//! and callers skip the work.

use thiserror::Error;

/// Errors that can occur in UI core operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// A DOM mutation was rejected by the host
    #[error("dom operation '{op}' failed: {reason}")]
    Dom {
        /// The host operation that failed
        op: &'static str,
        /// Host-provided failure description
        reason: String,
    },

    /// The host refused to change the document location
    #[error("navigation to '{url}' failed: {reason}")]
    Navigation {
        /// Destination that could not be reached
        url: String,
        /// Host-provided failure description
        reason: String,
    },

    /// Configuration could not be parsed or holds invalid values
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A data service call failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl UiError {
    /// Create a DOM error for the given host operation.
    pub fn dom(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Dom {
            op,
            reason: reason.into(),
        }
    }
}

/// Result type alias for UI core operations
pub type UiResult<T> = Result<T, UiError>;

/// Errors returned by data service accessors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service rejected the request; the message is shown to the user as-is
    #[error("{0}")]
    Rejected(String),

    /// The service could not be reached
    #[error("service unavailable")]
    Unavailable,
}

/// Result type alias for data service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Reasons an email address is refused before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing was entered
    #[error("Please enter your email address.")]
    Empty,

    /// The input does not look like an email address
    #[error("Please enter a valid email address.")]
    Malformed,
}
