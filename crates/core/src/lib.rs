//! Core types for memrepo
//!
//! This crate defines the vocabulary shared by the filter engine and the
//! repository:
//! - [`Value`]: weakly typed field value with natural equality and ordering
//! - [`Entity`]: trait for storable record types (identity + schema)
//! - [`Schema`] / [`FieldAccessor`]: field-name to getter/setter registry
//! - [`RepoError`] / [`RepoResult`]: error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod value;

pub use entity::{Entity, FieldAccessor, Schema, SchemaBuilder};
pub use error::{RepoError, RepoResult};
pub use value::{ConversionError, Value};
