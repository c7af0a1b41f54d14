//! Store errors.

use hrsync_client::ApiError;

/// Error type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Message used when a rejected create carries no server message.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Errors returned by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A create was refused. `message` is the server's, or [`UNKNOWN_ERROR`].
    #[error("{message}")]
    Rejected {
        /// Message suitable for a form-level error
        message: String,
        /// Underlying failure
        #[source]
        source: ApiError,
    },

    /// A fetch or mutation failed. `message` is also recorded in store state.
    #[error("{message}")]
    Failed {
        /// Generic, human-readable message
        message: String,
        /// Underlying failure
        #[source]
        source: ApiError,
    },

    /// A leave request was submitted without an attachment.
    #[error("A leave request needs at least one file attachment")]
    MissingAttachment,
}

impl StoreError {
    /// Underlying backend error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            StoreError::Rejected { source, .. } | StoreError::Failed { source, .. } => Some(source),
            StoreError::MissingAttachment => None,
        }
    }

    /// Whether the failure was an HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_user_facing_message() {
        let err = StoreError::Rejected {
            message: "Email already exists".into(),
            source: ApiError::Status { status: 409, message: Some("Email already exists".into()) },
        };
        assert_eq!(err.to_string(), "Email already exists");
        assert!(!err.is_unauthorized());

        let err = StoreError::Failed {
            message: "Error fetching leaves.".into(),
            source: ApiError::Status { status: 401, message: None },
        };
        assert!(err.is_unauthorized());
        assert!(StoreError::MissingAttachment.api_error().is_none());
    }
}
