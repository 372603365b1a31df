mod comment;
mod event;

pub use comment::{AddComment, AddCommentResponse, CommentPageDto, CommentsQuery, LikeComment};
pub use event::{EventDto, LikeEvent, UpsertEvent};

use bulletin_core::storage::RepositoryError;
use serde::Serialize;

/// Acknowledgement body for writes that return nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Unwraps a request field the client must send.
fn required<T>(value: Option<T>, field: &str) -> Result<T, RepositoryError> {
    value.ok_or_else(|| RepositoryError::Validation(format!("{field} is required")))
}
