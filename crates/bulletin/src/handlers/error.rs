use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bulletin_core::storage::{repository_error_to_status_code, RepositoryError};
use serde_json::json;

/// Handler error: any error, answered with the status its cause maps to.
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// A request the handler could not parse; answered with 400.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(RepositoryError::Validation(message.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = %status_code, error = %self.0, "API error");
        }

        (
            status_code,
            Json(json!({ "success": false, "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_keep_their_status() {
        let not_found = AppError::from(RepositoryError::not_found("Event", "x")).into_response();
        let invalid =
            AppError::from(RepositoryError::Validation("uqid is required".into())).into_response();
        let conflict = AppError::from(RepositoryError::conflict("Event", "x")).into_response();

        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_bad_request_is_400() {
        let response = AppError::bad_request("Failed to parse body").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let response = AppError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
