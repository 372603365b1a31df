//! Comment handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use bulletin_core::bulletin::Entity;

use crate::{
    handlers::AppError,
    models::{
        AddComment, AddCommentResponse, CommentPageDto, CommentsQuery, LikeComment,
        SuccessResponse,
    },
    state::AppState,
};

/// Add a comment to an event (POST /api/event/comment).
pub async fn add_comment(
    State(state): State<AppState>,
    payload: Result<Json<AddComment>, JsonRejection>,
) -> Result<Json<AddCommentResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|e| AppError::bad_request(format!("Failed to parse body: {e}")))?;
    let (event_uqid, user, text) = payload.into_parts()?;
    let comment = state.service.add_comment(event_uqid, user, text).await?;

    Ok(Json(AddCommentResponse {
        success: true,
        comment_uqid: comment.uqid(),
    }))
}

/// List a page of an event's comments (GET /api/event/comments).
pub async fn list_comments(
    State(state): State<AppState>,
    query: Result<Query<CommentsQuery>, QueryRejection>,
) -> Result<Json<CommentPageDto>, AppError> {
    let Query(query) =
        query.map_err(|e| AppError::bad_request(format!("Failed to parse query: {e}")))?;
    let page = state
        .service
        .get_comments(query.event_uqid()?, query.limit, query.cursor.as_deref())
        .await?;
    Ok(Json(page.into()))
}

/// Like a comment (POST /api/event/comment/like).
pub async fn like_comment(
    State(state): State<AppState>,
    payload: Result<Json<LikeComment>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|e| AppError::bad_request(format!("Failed to parse body: {e}")))?;
    state.service.like_comment(payload.comment_uqid()?).await?;
    Ok(Json(SuccessResponse::ok()))
}
