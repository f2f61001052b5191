//! Session and validation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("List {0} not found")]
    ListNotFound(u64),

    #[error("Todo {todo_id} not found in list {list_id}")]
    TodoNotFound { list_id: u64, todo_id: u64 },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid session data: {0}")]
    InvalidData(String),
}

impl SessionError {
    /// True for lookups that missed, as opposed to infrastructure failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SessionError::NotFound
                | SessionError::ListNotFound(_)
                | SessionError::TodoNotFound { .. }
        )
    }
}

/// Rejected user input. The display text is shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("List name must be between 1 and 100 characters.")]
    ListNameLength,

    #[error("List name must be unique.")]
    ListNameTaken,

    #[error("Todo must be between 1 and 100 characters.")]
    TodoTextLength,
}

pub type Result<T> = std::result::Result<T, SessionError>;
