//! Cache implementations backing the caching repository decorator.

pub mod memory;

pub use memory::TtlCache;
