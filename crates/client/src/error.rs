//! Action error handling with Sentry integration.
//!
//! Provides a unified `ActionError` type returned by every view action.
//! Each error maps to exactly one user notice; internal errors are captured
//! to Sentry before the notice is produced and never leak their detail.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::notice::Notice;
use crate::storage::StorageError;

/// Notice shown for any transport failure.
pub const CONNECTION_ERROR: &str = "Connection error";

/// Action-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A local precondition failed; no request was made.
    #[error("Validation: {0}")]
    Validation(String),

    /// The server refused the request. The message is user-facing.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// No response was received.
    #[error("Connectivity: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// A response did not match its schema.
    #[error("Unexpected response from {endpoint}: {source}")]
    UnexpectedShape {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Durable storage could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A page template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Shorthand for a validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify an API error.
    ///
    /// A rejection with a server reason becomes `"{context}: {reason}"`;
    /// without one the `fallback` message is used.
    #[must_use]
    pub fn from_api(err: ApiError, context: &str, fallback: &str) -> Self {
        match err {
            ApiError::Http(source) => Self::Connectivity(source),
            ApiError::Rejected {
                reason: Some(reason),
                ..
            } => Self::Rejected(format!("{context}: {reason}")),
            ApiError::Rejected { reason: None, .. } => Self::Rejected(fallback.to_string()),
            ApiError::UnexpectedShape { endpoint, source } => {
                Self::UnexpectedShape { endpoint, source }
            }
            err @ (ApiError::InvalidEndpoint { .. } | ApiError::Body(_)) => {
                Self::Internal(err.to_string())
            }
        }
    }

    /// The notice shown to the user for this error.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Validation(message) => Notice::warning(message.clone()),
            Self::Rejected(message) => Notice::error(message.clone()),
            Self::Connectivity(_) => Notice::error(CONNECTION_ERROR),
            Self::UnexpectedShape { .. } => Notice::error("Unexpected response from the server"),
            Self::Storage(_) => Notice::error("Could not save local data"),
            Self::Render(_) => Notice::error("Could not display the page"),
            Self::Internal(_) => Notice::error("Something went wrong"),
        }
    }

    /// Record the error and return its notice.
    #[must_use]
    pub fn into_notice(self) -> Notice {
        self.report();
        self.notice()
    }

    /// Log the error; internal failures are also captured to Sentry.
    pub fn report(&self) {
        match self {
            Self::UnexpectedShape { .. } | Self::Storage(_) | Self::Render(_) | Self::Internal(_) => {
                let event_id = sentry::capture_error(self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Action error"
                );
            }
            Self::Connectivity(source) => {
                tracing::warn!(error = %source, "API unreachable");
            }
            Self::Validation(_) | Self::Rejected(_) => {
                tracing::debug!(error = %self, "Action refused");
            }
        }
    }
}

impl From<CartError> for ActionError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::IndexOutOfRange { index, .. } => {
                Self::Validation(format!("No item at position {}", index + 1))
            }
            CartError::Storage(err) => Self::Storage(err),
        }
    }
}

/// Result type alias for `ActionError`.
pub type Result<T> = std::result::Result<T, ActionError>;

/// Set the Sentry user context after authentication.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
