//! Event handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    handlers::AppError,
    models::{EventDto, LikeEvent, SuccessResponse, UpsertEvent},
    state::AppState,
};

/// List all events (GET /api/event).
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventDto>>, AppError> {
    let events = state.service.get_events().await?;
    Ok(Json(events.into_iter().map(EventDto::from).collect()))
}

/// Create or update an event (POST /api/event).
///
/// Creates when the body has no `uqid`, otherwise updates that event.
pub async fn upsert_event(
    State(state): State<AppState>,
    payload: Result<Json<UpsertEvent>, JsonRejection>,
) -> Result<Json<EventDto>, AppError> {
    let Json(payload) =
        payload.map_err(|e| AppError::bad_request(format!("Failed to parse body: {e}")))?;
    let (uqid, patch) = payload.into_parts();
    let event = state.service.create_or_update_event(uqid, patch).await?;
    Ok(Json(event.into()))
}

/// Like an event (POST /api/event/like).
pub async fn like_event(
    State(state): State<AppState>,
    payload: Result<Json<LikeEvent>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|e| AppError::bad_request(format!("Failed to parse body: {e}")))?;
    state.service.like_event(payload.uqid()?).await?;
    Ok(Json(SuccessResponse::ok()))
}
