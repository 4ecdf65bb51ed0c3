//! Filter engine for memrepo
//!
//! Evaluates named entity fields against comparison operators:
//! - [`Check`]: the comparison operators
//! - [`Filter`] / [`FilterSet`]: field predicates and their conjunction
//! - [`Predicate`]: a filter set compiled against an entity schema
//! - [`SortSpec`]: multi-key result ordering
//!
//! Everything here is a pure function of (entity, filters); no state is kept.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod check;
pub mod engine;
pub mod filter;
pub mod sort;

pub use check::Check;
pub use engine::{evaluate, matches, Predicate};
pub use filter::{Filter, FilterSet};
pub use sort::{Sort, SortDir, SortSpec};
