//! Cached repository decorator.
//!
//! Wraps a repository with a TTL'd point and list cache and keeps it warm
//! with a background refresh task.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(InMemoryRepository::<Event>::new());
//! let cached = Arc::new(CachedRepository::new(store, &CacheSettings::default()));
//! let handle = spawn_refresh(&cached, Duration::from_secs(580));
//! ```

mod refresh;
mod repository;

pub use refresh::{spawn_refresh, RefreshHandle};
pub use repository::{CacheSettings, CachedRepository};
