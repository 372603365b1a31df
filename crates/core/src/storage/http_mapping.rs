//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Validation` -> 400 (Bad Request)
/// - `Conflict` -> 409 (Conflict)
///
/// # Examples
///
/// ```
/// use bulletin_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::not_found("Event", "abc-123");
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Validation(_) => 400,
        RepositoryError::Conflict { .. } => 409,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::not_found("Event", "evt-123");
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let error = RepositoryError::Validation("uqid is required".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let error = RepositoryError::conflict("Comment", "cmt-456");
        assert_eq!(repository_error_to_status_code(&error), 409);
    }
}
