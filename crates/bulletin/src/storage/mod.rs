//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `bulletin_core::storage`.

pub mod cached;
pub mod inmemory;

pub use inmemory::{InMemoryCommentRepository, InMemoryRepository};
