use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bulletin_core::bulletin::{Comment, CommentPage, Entity};
use bulletin_core::storage::RepositoryError;

use super::required;

/// Comment as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDto {
    pub uqid: Uuid,
    pub event_uqid: Uuid,
    pub user: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub number_of_likes: u64,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            uqid: comment.uqid(),
            event_uqid: comment.event_uqid,
            user: comment.user,
            text: comment.text,
            created_at: comment.audit.created_at,
            number_of_likes: comment.number_of_likes,
        }
    }
}

/// One page of comments and the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPageDto {
    pub comments: Vec<CommentDto>,
    pub next_cursor: Option<String>,
}

impl From<CommentPage> for CommentPageDto {
    fn from(page: CommentPage) -> Self {
        Self {
            comments: page.comments.into_iter().map(CommentDto::from).collect(),
            next_cursor: page.next_cursor,
        }
    }
}

/// Request payload for adding a comment; `uqid` is the event's.
#[derive(Debug, Default, Deserialize)]
pub struct AddComment {
    #[serde(default)]
    pub uqid: Option<Uuid>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl AddComment {
    /// Returns `(event_uqid, user, text)`.
    pub fn into_parts(self) -> Result<(Uuid, String, String), RepositoryError> {
        Ok((
            required(self.uqid, "uqid")?,
            required(self.user, "user")?,
            required(self.text, "text")?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddCommentResponse {
    pub success: bool,
    pub comment_uqid: Uuid,
}

/// Query parameters for listing an event's comments.
#[derive(Debug, Default, Deserialize)]
pub struct CommentsQuery {
    pub uqid: Option<Uuid>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

impl CommentsQuery {
    pub fn event_uqid(&self) -> Result<Uuid, RepositoryError> {
        required(self.uqid, "uqid")
    }
}

/// Request payload for liking a comment.
#[derive(Debug, Default, Deserialize)]
pub struct LikeComment {
    #[serde(default)]
    pub comment_uqid: Option<Uuid>,
}

impl LikeComment {
    pub fn comment_uqid(&self) -> Result<Uuid, RepositoryError> {
        required(self.comment_uqid, "comment_uqid")
    }
}
