//! Error types for `tasklist-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for task list operations.
#[derive(Error, Debug)]
pub enum TaskError {
    // === Task Errors ===
    /// Task with the specified ID was not found in the active identity's list.
    #[error("Task not found: {id}")]
    TaskNotFound { id: u64 },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority} (expected Low, Medium or High)")]
    InvalidPriority { priority: String },

    /// Invalid sort key.
    #[error("Invalid sort key: {sort} (expected created, priority or title)")]
    InvalidSort { sort: String },

    // === Session Errors ===
    /// A task operation was attempted without a signed-in identity.
    #[error("Not signed in")]
    NotSignedIn,

    // === Storage Errors ===
    /// The data file could not be rewritten. In-memory state is kept as is.
    #[error("Error saving tasks to {}: {reason}", path.display())]
    StorageWrite { path: PathBuf, reason: String },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TaskError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn storage_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StorageWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that should be shown to the user as an inline form message.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidPriority { .. } | Self::InvalidSort { .. }
        )
    }
}

/// Result type using `TaskError`.
pub type Result<T> = std::result::Result<T, TaskError>;
