//! Application state shared by every request handler.

use std::sync::Arc;

use bulletin_core::bulletin::Event;
use bulletin_core::storage::Repository;

use crate::{
    config::Config,
    mock_data::seed_demo_data,
    service::EventService,
    storage::{
        cached::{spawn_refresh, CachedRepository, RefreshHandle},
        InMemoryCommentRepository, InMemoryRepository,
    },
};

/// Shared application state.
///
/// Cloned for each request handler. Owns the background cache refresh, which
/// stops once the last clone is dropped.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
    #[allow(dead_code)]
    refresh: Option<Arc<RefreshHandle>>,
}

impl AppState {
    /// Builds the repositories described by `config`.
    ///
    /// With the cache enabled, events are served through a
    /// [`CachedRepository`] kept warm by a background refresh task.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryRepository::<Event>::new());
        let comments = Arc::new(InMemoryCommentRepository::new());

        let mut refresh = None;
        let events: Arc<dyn Repository<Event>> = if config.cache_enabled {
            let cached = Arc::new(CachedRepository::new(store, &config.cache_settings()));
            refresh = Some(Arc::new(spawn_refresh(
                &cached,
                config.cache_refresh_interval(),
            )));
            tracing::info!(
                ttl_secs = config.cache_ttl_seconds,
                refresh_secs = config.cache_refresh_seconds,
                "Event cache enabled"
            );
            cached
        } else {
            tracing::info!("Event cache disabled");
            store
        };

        let state = Self {
            service: Arc::new(EventService::new(events, comments)),
            refresh,
        };

        if config.seed_demo_data {
            seed_demo_data(&state.service).await?;
        }

        Ok(state)
    }
}

// Uncached, empty state for handler tests
#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        Self {
            service: Arc::new(EventService::new(
                Arc::new(InMemoryRepository::<Event>::new()),
                Arc::new(InMemoryCommentRepository::new()),
            )),
            refresh: None,
        }
    }
}
