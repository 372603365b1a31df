//! In-memory comment repository with a per-event index.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bulletin_core::bulletin::{
    clamp_limit, page_from, resolve_cursor, sort_comments, Comment, CommentPage, CommentPatch,
    Entity,
};
use bulletin_core::storage::{CommentRepository, ListQuery, Repository, Result};

use super::InMemoryRepository;

/// Comment storage plus the list of comment ids attached to each event.
///
/// Each comment id is indexed under exactly one event; re-creating a comment
/// moves it to its new event. Ordering for pagination is recomputed from the
/// comments themselves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentRepository {
    comments: InMemoryRepository<Comment>,
    by_event: Arc<RwLock<HashMap<Uuid, Vec<Uuid>>>>,
}

impl InMemoryCommentRepository {
    /// Creates a new empty comment repository.
    pub fn new() -> Self {
        Self::default()
    }

    async fn index(&self, event_uqid: Uuid, comment_uqid: Uuid) {
        let mut by_event = self.by_event.write().await;
        reindex(&mut by_event, event_uqid, comment_uqid);
    }
}

fn reindex(by_event: &mut HashMap<Uuid, Vec<Uuid>>, event_uqid: Uuid, comment_uqid: Uuid) {
    unindex(by_event, comment_uqid);
    by_event.entry(event_uqid).or_default().push(comment_uqid);
}

fn unindex(by_event: &mut HashMap<Uuid, Vec<Uuid>>, comment_uqid: Uuid) {
    for ids in by_event.values_mut() {
        ids.retain(|id| *id != comment_uqid);
    }
    by_event.retain(|_, ids| !ids.is_empty());
}

#[async_trait]
impl Repository<Comment> for InMemoryCommentRepository {
    async fn create(&self, item: Comment) -> Result<Comment> {
        let created = self.comments.create(item).await?;
        self.index(created.event_uqid, created.uqid()).await;
        Ok(created)
    }

    async fn create_many(&self, items: Vec<Comment>) -> Result<Vec<Comment>> {
        let created = self.comments.create_many(items).await?;

        let mut by_event = self.by_event.write().await;
        for comment in &created {
            reindex(&mut by_event, comment.event_uqid, comment.uqid());
        }

        Ok(created)
    }

    async fn get(&self, uqid: Uuid) -> Result<Option<Comment>> {
        self.comments.get(uqid).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Comment>> {
        self.comments.list(query).await
    }

    async fn update(
        &self,
        uqid: Uuid,
        patch: &CommentPatch,
        actor: &str,
    ) -> Result<Option<Comment>> {
        self.comments.update(uqid, patch, actor).await
    }

    async fn update_if(
        &self,
        uqid: Uuid,
        expected: &Comment,
        patch: &CommentPatch,
        actor: &str,
    ) -> Result<Option<Comment>> {
        self.comments.update_if(uqid, expected, patch, actor).await
    }

    async fn delete(&self, uqid: Uuid) -> Result<Option<Comment>> {
        let mut by_event = self.by_event.write().await;
        let Some(removed) = self.comments.delete(uqid).await? else {
            return Ok(None);
        };

        unindex(&mut by_event, uqid);
        Ok(Some(removed))
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn add_comment(&self, event_uqid: Uuid, comment: Comment) -> Result<Comment> {
        let created = self.comments.create(comment).await?;
        self.index(event_uqid, created.uqid()).await;

        tracing::debug!(%event_uqid, comment_uqid = %created.uqid(), "Comment added");
        Ok(created)
    }

    async fn get_comments_for_event(
        &self,
        event_uqid: Uuid,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<CommentPage> {
        let ids = {
            let by_event = self.by_event.read().await;
            by_event.get(&event_uqid).cloned().unwrap_or_default()
        };
        if ids.is_empty() {
            return Ok(CommentPage::default());
        }

        let mut sorted = self.comments.list(&ListQuery::all().with_ids(ids)).await?;
        sort_comments(&mut sorted);

        let start = resolve_cursor(&sorted, cursor).unwrap_or_else(|err| {
            tracing::warn!(
                %event_uqid,
                error = %err,
                "Ignoring comment cursor, restarting at first page"
            );
            0
        });

        Ok(page_from(sorted, start, clamp_limit(Some(limit))))
    }
}
