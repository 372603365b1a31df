//! In-memory cache backend.

#![allow(dead_code)]

mod cache;

pub use cache::TtlCache;
