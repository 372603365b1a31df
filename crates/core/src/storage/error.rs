use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// Absence of a record is not an error at the repository level: lookups
/// return `Option`. `NotFound` is raised by callers that require the record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("{entity_type} was modified concurrently: {id}")]
    Conflict {
        entity_type: &'static str,
        id: String,
    },
}

impl RepositoryError {
    pub fn not_found(entity_type: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn conflict(entity_type: &'static str, id: impl Display) -> Self {
        Self::Conflict {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
