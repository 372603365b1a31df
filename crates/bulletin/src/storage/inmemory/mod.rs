//! In-memory storage backend.
//!
//! Stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. Nothing is
//! persisted across restarts.

mod comments;
mod repository;

pub use comments::InMemoryCommentRepository;
pub use repository::InMemoryRepository;
