use std::fmt;

use crate::models::ValidationErrors;

/// The repository operation during which a storage failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Find,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Find => "find",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck {operation} failed: {source}")]
    Persistence {
        operation: Operation,
        #[source]
        source: Box<DeckError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Deck is invalid: {0}")]
    Validation(ValidationErrors),

    /// A fault inside this process or its stored data, such as a panicked
    /// worker task or a deck that references a card no longer in the catalog.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeckError {
    /// Tag an infrastructure failure with the repository operation it broke.
    ///
    /// Domain errors (missing rows, bad categories, validation) pass through
    /// unchanged so callers can still branch on them.
    pub fn during(self, operation: Operation) -> Self {
        match self {
            DeckError::DuckDb(_) | DeckError::Io(_) | DeckError::Json(_) | DeckError::Internal(_) => {
                DeckError::Persistence {
                    operation,
                    source: Box::new(self),
                }
            }
            other => other,
        }
    }

    /// `true` when the failure was caused by the caller's input rather than
    /// by the storage layer.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DeckError::NotFound(_)
                | DeckError::InvalidCategory(_)
                | DeckError::InvalidArgument(_)
                | DeckError::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
