//! Public types for the memrepo API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Data model
// ============================================================================

// Field values and conversions
pub use memrepo_core::{ConversionError, Value};

// Entity definition
pub use memrepo_core::{Entity, FieldAccessor, Schema, SchemaBuilder};

// Errors
pub use memrepo_core::{RepoError, RepoResult};

// ============================================================================
// Queries
// ============================================================================

pub use memrepo_query::{Check, Filter, FilterSet, Sort, SortDir, SortSpec};

// ============================================================================
// Storage
// ============================================================================

pub use memrepo_storage::{CopyPolicy, RepositoryOptions};
