//! Core for the bulletin project.
//!
//! Pure data types, repository contracts and the comment pagination algorithm.
//! Nothing in this crate performs I/O; concrete storage and caching live in
//! the `bulletin` crate.

pub mod bulletin;
pub mod cache;
pub mod storage;
