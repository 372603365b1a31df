//! Periodic background refresh of a cache.

use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use bulletin_core::bulletin::Entity;
use bulletin_core::storage::{Repository, Result};

use super::CachedRepository;

/// Something that can reload its cached state from the source of truth.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    /// Reloads and returns how many records were loaded.
    async fn refresh(&self) -> Result<usize>;
}

#[async_trait]
impl<T, R> Refresh for CachedRepository<T, R>
where
    T: Entity,
    R: Repository<T> + 'static,
{
    async fn refresh(&self) -> Result<usize> {
        CachedRepository::<T, R>::refresh(self).await
    }
}

/// Handle to a running refresh task. Dropping it stops the task.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

#[cfg(test)]
impl RefreshHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task that refreshes `target` every `interval`.
///
/// The first refresh runs immediately. Failures are logged and the loop
/// carries on. The task only holds a weak reference and exits once `target`
/// has been dropped.
///
/// # Panics
///
/// Panics if `interval` is zero.
pub fn spawn_refresh<C: Refresh>(target: &Arc<C>, interval: Duration) -> RefreshHandle {
    let target: Weak<C> = Arc::downgrade(target);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(target) = target.upgrade() else {
                tracing::debug!("Refresh target dropped, stopping background refresh");
                break;
            };

            match target.refresh().await {
                Ok(count) => tracing::trace!(count, "Background cache refresh completed"),
                Err(err) => tracing::warn!(error = %err, "Background cache refresh failed"),
            }
        }
    });

    tracing::debug!(interval_secs = interval.as_secs(), "Background refresh started");
    RefreshHandle { task }
}
