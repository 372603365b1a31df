//! Event service orchestrating the event and comment repositories.

use std::sync::Arc;

use uuid::Uuid;

use bulletin_core::bulletin::{
    clamp_limit, Comment, CommentPage, CommentPatch, Entity, Event, EventPatch, UNKNOWN_ACTOR,
};
use bulletin_core::storage::{CommentRepository, ListQuery, Repository, RepositoryError, Result};

/// How often a like is retried when another writer got there first.
const MAX_LIKE_ATTEMPTS: usize = 64;

/// An entity with a like counter.
pub trait Likeable: Entity {
    fn number_of_likes(&self) -> u64;

    fn likes_patch(number_of_likes: u64) -> Self::Patch;
}

impl Likeable for Event {
    fn number_of_likes(&self) -> u64 {
        self.number_of_likes
    }

    fn likes_patch(number_of_likes: u64) -> EventPatch {
        EventPatch::likes(number_of_likes)
    }
}

impl Likeable for Comment {
    fn number_of_likes(&self) -> u64 {
        self.number_of_likes
    }

    fn likes_patch(number_of_likes: u64) -> CommentPatch {
        CommentPatch::likes(number_of_likes)
    }
}

/// Adds one like to `uqid`.
///
/// Reads a snapshot and writes it back with `update_if`, retrying when a
/// concurrent writer changed the record in between. Gives up with
/// `RepositoryError::Conflict` after [`MAX_LIKE_ATTEMPTS`].
async fn add_like<T, R>(repository: &R, uqid: Uuid) -> Result<T>
where
    T: Likeable,
    R: Repository<T> + ?Sized,
{
    for attempt in 1..=MAX_LIKE_ATTEMPTS {
        let current = repository
            .get(uqid)
            .await?
            .ok_or_else(|| RepositoryError::not_found(T::ENTITY_TYPE, uqid))?;

        let patch = T::likes_patch(current.number_of_likes() + 1);
        match repository
            .update_if(uqid, &current, &patch, UNKNOWN_ACTOR)
            .await
        {
            Ok(Some(updated)) => return Ok(updated),
            Ok(None) => return Err(RepositoryError::not_found(T::ENTITY_TYPE, uqid)),
            Err(RepositoryError::Conflict { .. }) => {
                tracing::trace!(
                    %uqid,
                    attempt,
                    entity_type = T::ENTITY_TYPE,
                    "Like conflicted, retrying"
                );
                tokio::task::yield_now().await;
            }
            Err(err) => return Err(err),
        }
    }

    tracing::warn!(%uqid, entity_type = T::ENTITY_TYPE, "Like retries exhausted");
    Err(RepositoryError::conflict(T::ENTITY_TYPE, uqid))
}

/// Application operations on events and their comments.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn Repository<Event>>,
    comments: Arc<dyn CommentRepository>,
}

impl EventService {
    pub fn new(events: Arc<dyn Repository<Event>>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { events, comments }
    }

    /// Gets all events. Comments are never embedded.
    pub async fn get_events(&self) -> Result<Vec<Event>> {
        self.events.list(&ListQuery::all()).await
    }

    #[cfg(test)]
    pub async fn get_event(&self, uqid: Uuid) -> Result<Event> {
        self.events
            .get(uqid)
            .await?
            .ok_or_else(|| RepositoryError::not_found(Event::ENTITY_TYPE, uqid))
    }

    /// Creates a new event when `uqid` is `None`, otherwise applies `patch`
    /// to the existing one.
    ///
    /// Creating requires a name; absent description and image link default
    /// to empty.
    pub async fn create_or_update_event(
        &self,
        uqid: Option<Uuid>,
        patch: EventPatch,
    ) -> Result<Event> {
        if let Some(uqid) = uqid {
            let updated = self
                .events
                .update(uqid, &patch, UNKNOWN_ACTOR)
                .await?
                .ok_or_else(|| RepositoryError::not_found(Event::ENTITY_TYPE, uqid))?;

            tracing::info!(%uqid, "Event updated");
            return Ok(updated);
        }

        let name = patch
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| RepositoryError::Validation("name is required".to_string()))?;

        let event = Event::new(
            name,
            patch.description.unwrap_or_default(),
            patch.img_link.unwrap_or_default(),
        )
        .with_likes(patch.number_of_likes.unwrap_or(0));

        let created = self.events.create(event).await?;
        tracing::info!(uqid = %created.uqid(), name = %created.name, "Event created");
        Ok(created)
    }

    pub async fn like_event(&self, uqid: Uuid) -> Result<Event> {
        let event = add_like::<Event, _>(&*self.events, uqid).await?;
        tracing::debug!(%uqid, likes = event.number_of_likes, "Event liked");
        Ok(event)
    }

    /// Attaches a new comment by `user` to `event_uqid`.
    ///
    /// The event is not required to exist.
    pub async fn add_comment(
        &self,
        event_uqid: Uuid,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Comment> {
        let comment = Comment::new(event_uqid, user, text);
        let saved = self.comments.add_comment(event_uqid, comment).await?;

        tracing::info!(%event_uqid, comment_uqid = %saved.uqid(), "Comment saved");
        Ok(saved)
    }

    /// Gets one page of an event's comments; see
    /// [`CommentRepository::get_comments_for_event`].
    pub async fn get_comments(
        &self,
        event_uqid: Uuid,
        limit: Option<usize>,
        cursor: Option<&str>,
    ) -> Result<CommentPage> {
        let page = self
            .comments
            .get_comments_for_event(event_uqid, clamp_limit(limit), cursor)
            .await?;

        tracing::debug!(
            %event_uqid,
            count = page.comments.len(),
            has_more = page.next_cursor.is_some(),
            "Comments retrieved"
        );
        Ok(page)
    }

    pub async fn like_comment(&self, comment_uqid: Uuid) -> Result<Comment> {
        let comment = add_like::<Comment, _>(&*self.comments, comment_uqid).await?;
        tracing::debug!(%comment_uqid, likes = comment.number_of_likes, "Comment liked");
        Ok(comment)
    }
}
