//! Error types for field resolution and its collaborators

use std::path::PathBuf;
use thiserror::Error;

/// Result type for portal field operations
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors raised for caller contract violations and collaborator failures.
///
/// Per-field data problems are never errors; they surface as
/// [`FieldIssue`](crate::core::resolver::FieldIssue) diagnostics instead.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Structurally invalid input, e.g. a schema whose `fields` is not a sequence
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No form definition exists for the requested context
    #[error("form not found for {context}/{context_type}: {path}")]
    FormNotFound {
        /// Form context (e.g. `users`)
        context: String,
        /// Form context type (e.g. `teacher`)
        context_type: String,
        /// Location that was searched
        path: PathBuf,
    },

    /// No profile data exists for the requested user
    #[error("profile not found for user '{user_id}': {path}")]
    ProfileNotFound {
        /// Requested user identifier
        user_id: String,
        /// Location that was searched
        path: PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldError {
    /// Shorthand for [`FieldError::InvalidInput`]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = FieldError::invalid("schema `fields` must be an array");
        assert_eq!(
            err.to_string(),
            "invalid input: schema `fields` must be an array"
        );
    }

    #[test]
    fn test_form_not_found_display() {
        let err = FieldError::FormNotFound {
            context: "users".into(),
            context_type: "teacher".into(),
            path: PathBuf::from("forms/users.teacher.json"),
        };
        let msg = err.to_string();
        assert!(msg.contains("users/teacher"));
        assert!(msg.contains("users.teacher.json"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FieldError = parse_err.into();
        assert!(matches!(err, FieldError::Json(_)));
    }
}
