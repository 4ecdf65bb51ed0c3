//! Repository configuration
//!
//! This module provides the [`CopyPolicy`] and [`RepositoryOptions`] types used
//! to control how a repository isolates its entities from callers.

use serde::{Deserialize, Serialize};

/// When the repository makes a shallow copy of an entity
///
/// Entities are stored behind `Arc`. A copy is a fresh `Arc` around a
/// `Clone` of the entity.
///
/// - On ingest: the stored `Arc` is never one the producer still holds.
/// - On fetch: every returned `Arc` is uniquely owned by the caller, so
///   `Arc::get_mut` succeeds and in-place edits never reach the store or
///   any other fetch result.
///
/// Without a fetch copy, returned `Arc`s alias storage; callers that want to
/// edit use `Arc::make_mut`, which clones on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyPolicy {
    /// Never copy
    None,
    /// Copy entities entering the repository
    ShallowCopyOnIngest,
    /// Copy entities leaving the repository
    ShallowCopyOnFetch,
    /// Copy in both directions (default)
    #[default]
    ShallowCopyBoth,
}

impl CopyPolicy {
    /// Whether ingest stores a private copy
    #[inline]
    pub fn copies_on_ingest(self) -> bool {
        matches!(self, CopyPolicy::ShallowCopyOnIngest | CopyPolicy::ShallowCopyBoth)
    }

    /// Whether fetch hands out private copies
    #[inline]
    pub fn copies_on_fetch(self) -> bool {
        matches!(self, CopyPolicy::ShallowCopyOnFetch | CopyPolicy::ShallowCopyBoth)
    }
}

/// Options for creating a repository.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use memrepo_storage::{CopyPolicy, RepositoryOptions};
///
/// let opts = RepositoryOptions::new()
///     .copy_policy(CopyPolicy::ShallowCopyOnFetch)
///     .initial_capacity(1024);
/// assert_eq!(opts.copy_policy, CopyPolicy::ShallowCopyOnFetch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryOptions {
    /// Copy policy applied on ingest and fetch
    pub copy_policy: CopyPolicy,
    /// Number of entities to reserve space for up front
    pub initial_capacity: usize,
}

impl RepositoryOptions {
    /// Create options with default settings (copy both ways, no reservation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the copy policy.
    pub fn copy_policy(mut self, policy: CopyPolicy) -> Self {
        self.copy_policy = policy;
        self
    }

    /// Set the initial capacity.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
