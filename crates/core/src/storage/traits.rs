use async_trait::async_trait;
use uuid::Uuid;

use crate::bulletin::{Comment, CommentPage, Entity};

use super::{ListQuery, Result};

/// Keyed store for one entity type.
///
/// Lookups and writes on a missing `uqid` return `Ok(None)`; errors are
/// reserved for invalid queries and failed preconditions.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Stores a new entity, overwriting any record with the same `uqid`.
    async fn create(&self, item: T) -> Result<T>;

    /// Stores several entities at once.
    async fn create_many(&self, items: Vec<T>) -> Result<Vec<T>>;

    /// Gets an entity by its `uqid`.
    async fn get(&self, uqid: Uuid) -> Result<Option<T>>;

    /// Lists entities matching `query`. Result order is unspecified.
    async fn list(&self, query: &ListQuery) -> Result<Vec<T>>;

    /// Merges `patch` over the stored record and replaces it.
    async fn update(&self, uqid: Uuid, patch: &T::Patch, actor: &str) -> Result<Option<T>>;

    /// Like [`Repository::update`], but only when the stored record still
    /// equals `expected`.
    ///
    /// Fails with `RepositoryError::Conflict` when it does not.
    async fn update_if(
        &self,
        uqid: Uuid,
        expected: &T,
        patch: &T::Patch,
        actor: &str,
    ) -> Result<Option<T>>;

    /// Removes an entity, returning what was stored.
    async fn delete(&self, uqid: Uuid) -> Result<Option<T>>;
}

/// Comment store that also knows which comments belong to which event.
#[async_trait]
pub trait CommentRepository: Repository<Comment> {
    /// Stores `comment` and appends it to `event_uqid`'s comments.
    async fn add_comment(&self, event_uqid: Uuid, comment: Comment) -> Result<Comment>;

    /// Returns one page of an event's comments in `(created_at, uqid)` order.
    ///
    /// `cursor` is the `next_cursor` of the previous page. A cursor that
    /// cannot be resolved restarts at the first page.
    async fn get_comments_for_event(
        &self,
        event_uqid: Uuid,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<CommentPage>;
}
