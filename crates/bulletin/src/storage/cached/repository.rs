//! Caching repository decorator.
//!
//! Wraps any [`Repository`] with a read-through point cache and list cache.
//! Writes go to the wrapped repository first; the caches are updated only
//! after the write succeeded.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use bulletin_core::bulletin::Entity;
use bulletin_core::cache::list_key;
use bulletin_core::storage::{ListQuery, Repository, RepositoryError, Result};

use crate::cache::TtlCache;

/// Sizing and expiry of the caches kept by a [`CachedRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum age of any cache entry.
    pub ttl: Duration,
    /// Capacity of the `uqid -> entity` cache.
    pub max_point_entries: usize,
    /// Capacity of the `query -> entities` cache.
    pub max_list_entries: usize,
}

impl CacheSettings {
    /// Returns the point cache capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn max_point_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_point_entries).unwrap_or(NonZeroUsize::MIN)
    }

    /// Returns the list cache capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn max_list_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_list_entries).unwrap_or(NonZeroUsize::MIN)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_point_entries: 5_000,
            max_list_entries: 150,
        }
    }
}

/// Both caches plus a counter of completed writes.
///
/// A read remembers the generation it started at and only fills the cache if
/// no write completed while it was talking to the store.
struct CacheState<T: Entity> {
    points: TtlCache<Uuid, Option<T>>,
    lists: TtlCache<String, Vec<T>>,
    generation: u64,
}

impl<T: Entity> CacheState<T> {
    fn new(settings: &CacheSettings) -> Self {
        Self {
            points: TtlCache::new(settings.max_point_entries_non_zero(), settings.ttl),
            lists: TtlCache::new(settings.max_list_entries_non_zero(), settings.ttl),
            generation: 0,
        }
    }

    fn store_list(&mut self, key: String, items: &[T]) {
        for item in items {
            self.points.insert(item.uqid(), Some(item.clone()));
        }
        self.lists.insert(key, items.to_vec());
    }

    /// Records a completed write that may change any list result.
    fn written(&mut self) {
        self.lists.clear();
        self.generation += 1;
    }
}

/// Read-through, write-through cache in front of a repository.
///
/// - **Reads**: served from the cache when present; on a miss the store is
///   queried and the result, including absence, is cached.
/// - **Writes**: persisted to the store while holding the cache lock, then
///   the point entry is replaced and every cached list is dropped.
///
/// Writes made directly on the wrapped repository become visible once the
/// affected entries expire or a [`refresh`](CachedRepository::refresh) runs.
pub struct CachedRepository<T: Entity, R: Repository<T>> {
    repository: Arc<R>,
    state: Mutex<CacheState<T>>,
}

impl<T: Entity, R: Repository<T>> CachedRepository<T, R> {
    /// Creates a new caching decorator around `repository`.
    pub fn new(repository: Arc<R>, settings: &CacheSettings) -> Self {
        Self {
            repository,
            state: Mutex::new(CacheState::new(settings)),
        }
    }

    /// Reloads the unfiltered list from the store, bypassing the list cache.
    ///
    /// Repopulates the unfiltered list entry and the point entry of every
    /// returned entity. Returns how many entities were loaded.
    pub async fn refresh(&self) -> Result<usize> {
        let query = ListQuery::all();
        let generation = self.state.lock().await.generation;

        let items = self.repository.list(&query).await?;

        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.store_list(list_key(&query), &items);
        }

        tracing::trace!(
            entity_type = T::ENTITY_TYPE,
            count = items.len(),
            "Cache refreshed"
        );
        Ok(items.len())
    }
}

#[async_trait]
impl<T, R> Repository<T> for CachedRepository<T, R>
where
    T: Entity,
    R: Repository<T> + 'static,
{
    async fn create(&self, item: T) -> Result<T> {
        let mut state = self.state.lock().await;
        let created = self.repository.create(item).await?;

        state.points.insert(created.uqid(), Some(created.clone()));
        state.written();

        tracing::debug!(
            uqid = %created.uqid(),
            entity_type = T::ENTITY_TYPE,
            "Entity created"
        );
        Ok(created)
    }

    async fn create_many(&self, items: Vec<T>) -> Result<Vec<T>> {
        let mut state = self.state.lock().await;
        let created = self.repository.create_many(items).await?;

        for item in &created {
            state.points.insert(item.uqid(), Some(item.clone()));
        }
        state.written();

        tracing::debug!(
            count = created.len(),
            entity_type = T::ENTITY_TYPE,
            "Entities created"
        );
        Ok(created)
    }

    async fn get(&self, uqid: Uuid) -> Result<Option<T>> {
        let generation = {
            let mut state = self.state.lock().await;
            if let Some(cached) = state.points.get(&uqid) {
                tracing::trace!(%uqid, entity_type = T::ENTITY_TYPE, "Cache hit");
                return Ok(cached.clone());
            }
            state.generation
        };

        tracing::trace!(%uqid, entity_type = T::ENTITY_TYPE, "Cache miss");
        let item = self.repository.get(uqid).await?;

        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.points.insert(uqid, item.clone());
        }

        Ok(item)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<T>> {
        let key = list_key(query);

        let generation = {
            let mut state = self.state.lock().await;
            if let Some(cached) = state.lists.get(&key) {
                tracing::trace!(
                    key = %key,
                    count = cached.len(),
                    entity_type = T::ENTITY_TYPE,
                    "Cache hit for list"
                );
                return Ok(cached.clone());
            }
            state.generation
        };

        tracing::trace!(key = %key, entity_type = T::ENTITY_TYPE, "Cache miss for list");
        let items = self.repository.list(query).await?;

        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.store_list(key, &items);
        }

        Ok(items)
    }

    async fn update(&self, uqid: Uuid, patch: &T::Patch, actor: &str) -> Result<Option<T>> {
        let mut state = self.state.lock().await;
        let updated = self.repository.update(uqid, patch, actor).await?;

        match &updated {
            Some(item) => state.points.insert(uqid, Some(item.clone())),
            None => {
                state.points.remove(&uqid);
            }
        }
        state.written();

        tracing::debug!(
            %uqid,
            entity_type = T::ENTITY_TYPE,
            found = updated.is_some(),
            "Entity updated"
        );
        Ok(updated)
    }

    async fn update_if(
        &self,
        uqid: Uuid,
        expected: &T,
        patch: &T::Patch,
        actor: &str,
    ) -> Result<Option<T>> {
        let mut state = self.state.lock().await;
        let result = self
            .repository
            .update_if(uqid, expected, patch, actor)
            .await;

        match &result {
            Ok(Some(item)) => {
                state.points.insert(uqid, Some(item.clone()));
                state.written();
            }
            Ok(None) => {
                state.points.remove(&uqid);
                state.written();
            }
            Err(RepositoryError::Conflict { .. }) => {
                // The cached snapshot may be the stale one the caller read
                state.points.remove(&uqid);
                state.generation += 1;
                tracing::debug!(
                    %uqid,
                    entity_type = T::ENTITY_TYPE,
                    "Conditional update conflicted"
                );
            }
            Err(_) => {}
        }

        result
    }

    async fn delete(&self, uqid: Uuid) -> Result<Option<T>> {
        let mut state = self.state.lock().await;
        let removed = self.repository.delete(uqid).await?;

        if removed.is_some() {
            state.points.remove(&uqid);
            state.written();
            tracing::debug!(%uqid, entity_type = T::ENTITY_TYPE, "Entity deleted");
        }

        Ok(removed)
    }
}
