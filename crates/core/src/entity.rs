//! Entity trait and field accessor registry
//!
//! Filters name fields by string. Rather than looking fields up dynamically
//! on every evaluation, each entity type registers a [`Schema`]: a map from
//! field name to a [`FieldAccessor`] (getter plus optional setter). The
//! schema is built once when a repository is created; unknown field names
//! are detected when a query is compiled, before any entity is visited.
//!
//! # Example
//!
//! ```
//! use memrepo_core::{Entity, Schema, Value};
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
//!             .field_with_setter(
//!                 "name",
//!                 |c: &Cat| Value::from(c.name.clone()),
//!                 |c: &mut Cat, v| {
//!                     c.name = v.into_option()?;
//!                     Ok(())
//!                 },
//!             )
//!             .field("weight", |c: &Cat| Value::from(c.weight))
//!             .build()
//!     }
//! }
//!
//! let schema = Cat::schema();
//! let cat = Cat { id: 1, name: None, weight: 12 };
//! assert_eq!(schema.accessor("weight").unwrap().get(&cat), Value::from(12));
//! assert!(schema.accessor("color").is_err());
//! ```

use crate::error::{RepoError, RepoResult};
use crate::value::{ConversionError, Value};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A record type that can be stored in a repository
///
/// `Clone` is the shallow copy the repository's copy policy uses: it should
/// duplicate the record field by field.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identity type; entities with equal identity are the same logical record
    type Id: Eq + Hash + Clone + Send + Sync + fmt::Debug;

    /// Identity of this entity
    fn id(&self) -> Self::Id;

    /// Field accessors for this entity type
    fn schema() -> Schema<Self>;
}

type Getter<E> = Arc<dyn Fn(&E) -> Value + Send + Sync>;
type Setter<E> = Arc<dyn Fn(&mut E, Value) -> Result<(), ConversionError> + Send + Sync>;

/// Getter/setter pair for one named field
pub struct FieldAccessor<E> {
    name: String,
    getter: Getter<E>,
    setter: Option<Setter<E>>,
}

impl<E> FieldAccessor<E> {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the field from an entity
    #[inline]
    pub fn get(&self, entity: &E) -> Value {
        (self.getter)(entity)
    }

    /// Check whether the field can be assigned
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Write the field on an entity
    ///
    /// # Errors
    ///
    /// - `ReadOnlyField` if no setter is registered
    /// - `TypeMismatch` if the setter rejects the value's runtime type
    pub fn set(&self, entity: &mut E, value: Value) -> RepoResult<()> {
        let setter = self.setter.as_ref().ok_or_else(|| RepoError::ReadOnlyField {
            field: self.name.clone(),
        })?;
        setter(entity, value)
            .map_err(|e| RepoError::type_mismatch(self.name.clone(), e.expected, e.actual))
    }
}

impl<E> Clone for FieldAccessor<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
        }
    }
}

impl<E> fmt::Debug for FieldAccessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("name", &self.name)
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// Registry of field accessors for one entity type
pub struct Schema<E> {
    fields: FxHashMap<String, FieldAccessor<E>>,
    /// Registration order, for listing
    order: Vec<String>,
}

impl<E> Schema<E> {
    /// Start building a schema
    pub fn builder() -> SchemaBuilder<E> {
        SchemaBuilder {
            schema: Schema {
                fields: FxHashMap::default(),
                order: Vec::new(),
            },
        }
    }

    /// Resolve a field by name
    ///
    /// # Errors
    ///
    /// `FieldNotFound` if no accessor is registered under `field`.
    pub fn accessor(&self, field: &str) -> RepoResult<&FieldAccessor<E>> {
        self.fields
            .get(field)
            .ok_or_else(|| RepoError::field_not_found(field))
    }

    /// Check if a field is registered
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in registration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no field is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<E> Clone for Schema<E> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            order: self.order.clone(),
        }
    }
}

impl<E> fmt::Debug for Schema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("fields", &self.order).finish()
    }
}

/// Builder for [`Schema`]
///
/// Registering the same name twice replaces the earlier accessor.
pub struct SchemaBuilder<E> {
    schema: Schema<E>,
}

impl<E> SchemaBuilder<E> {
    /// Register a read-only field
    pub fn field<G>(self, name: impl Into<String>, getter: G) -> Self
    where
        G: Fn(&E) -> Value + Send + Sync + 'static,
    {
        self.insert(FieldAccessor {
            name: name.into(),
            getter: Arc::new(getter),
            setter: None,
        })
    }

    /// Register a field that can also be assigned
    pub fn field_with_setter<G, S>(self, name: impl Into<String>, getter: G, setter: S) -> Self
    where
        G: Fn(&E) -> Value + Send + Sync + 'static,
        S: Fn(&mut E, Value) -> Result<(), ConversionError> + Send + Sync + 'static,
    {
        self.insert(FieldAccessor {
            name: name.into(),
            getter: Arc::new(getter),
            setter: Some(Arc::new(setter)),
        })
    }

    fn insert(mut self, accessor: FieldAccessor<E>) -> Self {
        let name = accessor.name.clone();
        if self.schema.fields.insert(name.clone(), accessor).is_none() {
            self.schema.order.push(name);
        }
        self
    }

    /// Finish building
    pub fn build(self) -> Schema<E> {
        self.schema
    }
}
