//! Storage layer for memrepo
//!
//! This crate provides the thread-safe entity store:
//! - [`InMemoryRepository`]: identity-keyed, insertion-ordered entity storage
//! - [`RepositoryOptions`] / [`CopyPolicy`]: isolation between callers and the store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod options;
pub mod repository;

pub use options::{CopyPolicy, RepositoryOptions};
pub use repository::InMemoryRepository;
