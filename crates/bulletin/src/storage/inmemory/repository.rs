//! Generic in-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use bulletin_core::bulletin::Entity;
use bulletin_core::storage::{CompiledFilter, ListQuery, Repository, RepositoryError, Result};

/// In-memory storage for one entity type.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Clones share the same underlying store. Data is not persisted and is lost
/// when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<T: Entity> {
    items: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryRepository<T> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, item: T) -> Result<T> {
        let mut items = self.items.write().await;
        items.insert(item.uqid(), item.clone());
        Ok(item)
    }

    async fn create_many(&self, new_items: Vec<T>) -> Result<Vec<T>> {
        let mut items = self.items.write().await;
        for item in &new_items {
            items.insert(item.uqid(), item.clone());
        }
        Ok(new_items)
    }

    async fn get(&self, uqid: Uuid) -> Result<Option<T>> {
        let items = self.items.read().await;
        Ok(items.get(&uqid).cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<T>> {
        let filter = CompiledFilter::<T>::compile(query)?;

        let items = self.items.read().await;
        let matching = items.values().filter(|item| filter.matches(item)).cloned();

        Ok(query.paginate(matching))
    }

    async fn update(&self, uqid: Uuid, patch: &T::Patch, actor: &str) -> Result<Option<T>> {
        let mut items = self.items.write().await;
        let Some(current) = items.get(&uqid) else {
            return Ok(None);
        };

        let updated = current.apply(patch, actor, Utc::now());
        items.insert(uqid, updated.clone());
        Ok(Some(updated))
    }

    async fn update_if(
        &self,
        uqid: Uuid,
        expected: &T,
        patch: &T::Patch,
        actor: &str,
    ) -> Result<Option<T>> {
        let mut items = self.items.write().await;
        let Some(current) = items.get(&uqid) else {
            return Ok(None);
        };

        if current != expected {
            return Err(RepositoryError::conflict(T::ENTITY_TYPE, uqid));
        }

        let updated = current.apply(patch, actor, Utc::now());
        items.insert(uqid, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, uqid: Uuid) -> Result<Option<T>> {
        let mut items = self.items.write().await;
        Ok(items.remove(&uqid))
    }
}
