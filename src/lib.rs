//! memrepo: a thread-safe in-memory entity repository
//!
//! Entities are stored by identity in insertion order and queried by
//! predicates over named fields. Copies are made on the way in and out
//! according to a [`CopyPolicy`], so callers never share mutable state with
//! the store unless they opt out.
//!
//! # Example
//!
//! ```
//! use memrepo::prelude::*;
//!
//! #[derive(Clone)]
//! struct Cat {
//!     id: i64,
//!     name: Option<String>,
//!     weight: i64,
//! }
//!
//! impl Entity for Cat {
//!     type Id = i64;
//!
//!     fn id(&self) -> i64 {
//!         self.id
//!     }
//!
//!     fn schema() -> Schema<Self> {
//!         Schema::builder()
//!             .field("id", |c: &Cat| Value::from(c.id))
//!             .field("name", |c: &Cat| Value::from(c.name.clone()))
//!             .field("weight", |c: &Cat| Value::from(c.weight))
//!             .build()
//!     }
//! }
//!
//! let repo = InMemoryRepository::<Cat>::new();
//! repo.ingest(Cat { id: 1, name: Some("Vasya".into()), weight: 12 });
//! repo.ingest(Cat { id: 2, name: None, weight: 4 });
//!
//! let named = FilterSet::from(Filter::is_not_null("name"));
//! assert_eq!(repo.instant_count(Some(&named))?, 1);
//! # Ok::<(), RepoError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod types;

pub use memrepo_storage::InMemoryRepository;
pub use types::*;

/// Filter evaluation without a repository
pub use memrepo_query::{evaluate, matches, Predicate};

/// Everything needed to define entities and query a repository
pub mod prelude {
    pub use crate::types::*;
    pub use crate::InMemoryRepository;
}
