//! In-memory entity repository
//!
//! Holds entities keyed by identity, in insertion order, behind a single
//! `parking_lot::RwLock`.
//!
//! # Design
//!
//! - `Vec<Arc<E>>`: insertion order, upserts replace in place
//! - `FxHashMap<E::Id, usize>`: identity to position, O(1) upsert
//! - `RwLock`: ingest holds the write lock for one upsert; count and fetch
//!   hold the read lock for one filter pass, so readers never block each
//!   other and never observe a half-applied upsert
//!
//! parking_lot's lock is eventually fair, so a stream of readers cannot
//! starve a waiting writer. Entities are immutable once stored (edits
//! replace the `Arc`), which lets fetch release the lock before copying.
//!
//! # Example
//!
//! ```ignore
//! use memrepo_storage::{InMemoryRepository, RepositoryOptions};
//! use memrepo_query::{Filter, FilterSet};
//! use std::sync::Arc;
//!
//! let repo = Arc::new(InMemoryRepository::<Cat>::new());
//! repo.ingest(cat);
//! let heavy = FilterSet::from(Filter::ge("weight", 10));
//! let count = repo.instant_count(Some(&heavy))?;
//! ```

use crate::options::RepositoryOptions;
use memrepo_core::{Entity, RepoError, RepoResult, Schema, Value};
use memrepo_query::{FilterSet, Predicate, SortSpec};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

/// Ordered, identity-unique entity storage
struct Entries<E: Entity> {
    items: Vec<Arc<E>>,
    index: FxHashMap<E::Id, usize>,
}

impl<E: Entity> Entries<E> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert or replace in place; returns true on replace
    fn upsert(&mut self, id: E::Id, entity: Arc<E>) -> bool {
        match self.index.entry(id) {
            Entry::Occupied(slot) => {
                self.items[*slot.get()] = entity;
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(self.items.len());
                self.items.push(entity);
                false
            }
        }
    }

    fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        self.index.clear();
        removed
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, entity) in self.items.iter().enumerate() {
            self.index.insert(entity.id(), pos);
        }
    }

    fn matching_positions(&self, predicate: &Predicate<'_, E>) -> RepoResult<Vec<usize>> {
        let mut positions = Vec::new();
        for (pos, entity) in self.items.iter().enumerate() {
            if predicate.matches(entity)? {
                positions.push(pos);
            }
        }
        Ok(positions)
    }

    fn first_position(&self, predicate: &Predicate<'_, E>) -> RepoResult<Option<usize>> {
        for (pos, entity) in self.items.iter().enumerate() {
            if predicate.matches(entity)? {
                return Ok(Some(pos));
            }
        }
        Ok(None)
    }

    /// Drop every entity whose mark is set; survivors keep their order
    fn remove_marked(&mut self, marks: &[bool]) -> usize {
        let before = self.items.len();
        let items = std::mem::take(&mut self.items);
        self.items = items
            .into_iter()
            .zip(marks)
            .filter(|(_, &marked)| !marked)
            .map(|(entity, _)| entity)
            .collect();
        let removed = before - self.items.len();
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    /// Store edited entities at their positions
    ///
    /// If an edit changed an identity, the index is rebuilt. Where two
    /// entities now share an identity, the one in the earlier slot is
    /// overwritten; an edited entity is never overwritten by an unedited one.
    fn replace(&mut self, updates: Vec<(usize, Arc<E>)>) {
        let rekeyed = updates
            .iter()
            .any(|(pos, entity)| self.items[*pos].id() != entity.id());
        if !rekeyed {
            for (pos, entity) in updates {
                self.items[pos] = entity;
            }
            return;
        }

        let mut edited = vec![false; self.items.len()];
        for (pos, entity) in updates {
            self.items[pos] = entity;
            edited[pos] = true;
        }

        let items = std::mem::take(&mut self.items);
        let mut kept_edited: Vec<bool> = Vec::with_capacity(items.len());
        self.index.clear();
        for (entity, is_edited) in items.into_iter().zip(edited) {
            match self.index.entry(entity.id()) {
                Entry::Occupied(slot) => {
                    let pos = *slot.get();
                    if is_edited || !kept_edited[pos] {
                        self.items[pos] = entity;
                        kept_edited[pos] = is_edited;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(self.items.len());
                    self.items.push(entity);
                    kept_edited.push(is_edited);
                }
            }
        }
    }
}

/// Thread-safe in-memory repository of entities
///
/// # Thread Safety
///
/// All operations are thread-safe and synchronous. Share the repository via
/// `Arc<InMemoryRepository<E>>`:
/// - `ingest()`: one write-lock acquisition per entity
/// - `instant_count()` / `instant_fetch()`: one read-lock acquisition for
///   a consistent snapshot
/// - concurrent ingests of distinct identities are never lost; concurrent
///   ingests of one identity leave one of the values (last applied wins)
pub struct InMemoryRepository<E: Entity> {
    entries: RwLock<Entries<E>>,
    schema: Schema<E>,
    options: RepositoryOptions,
}

impl<E: Entity> InMemoryRepository<E> {
    /// Create a repository with default options
    pub fn new() -> Self {
        Self::with_options(RepositoryOptions::default())
    }

    /// Create a repository with explicit options
    pub fn with_options(options: RepositoryOptions) -> Self {
        Self {
            entries: RwLock::new(Entries::with_capacity(options.initial_capacity)),
            schema: E::schema(),
            options,
        }
    }

    /// Options this repository was created with
    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Field accessors resolved at construction
    pub fn schema(&self) -> &Schema<E> {
        &self.schema
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entries.read().items.len()
    }

    /// Check if the repository is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().items.is_empty()
    }

    /// Check if an entity with this identity is stored
    pub fn contains(&self, id: &E::Id) -> bool {
        self.entries.read().index.contains_key(id)
    }

    /// Get an entity by identity
    ///
    /// The copy policy applies as for fetch.
    pub fn get(&self, id: &E::Id) -> Option<Arc<E>> {
        let found = {
            let entries = self.entries.read();
            entries
                .index
                .get(id)
                .map(|&pos| Arc::clone(&entries.items[pos]))
        };
        found.map(|entity| self.hand_out(entity))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert an entity, replacing any stored entity with the same identity
    ///
    /// A replacement keeps the position of the entity it replaces; a new
    /// identity is appended.
    pub fn ingest(&self, entity: impl Into<Arc<E>>) {
        let entity = self.admit(entity.into());
        let id = entity.id();
        let replaced = self.entries.write().upsert(id, entity);
        tracing::trace!(target: "memrepo::storage", replaced, "entity ingested");
    }

    /// Insert a batch of entities under one write lock
    ///
    /// With `clear` set, the repository is emptied first, atomically with
    /// the batch. Returns the number of entities ingested.
    pub fn ingest_all(&self, entities: impl IntoIterator<Item = impl Into<Arc<E>>>, clear: bool) -> usize {
        let admitted: Vec<(E::Id, Arc<E>)> = entities
            .into_iter()
            .map(|entity| {
                let entity = self.admit(entity.into());
                (entity.id(), entity)
            })
            .collect();
        let count = admitted.len();

        let mut entries = self.entries.write();
        let cleared = if clear { entries.clear() } else { 0 };
        let mut replaced = 0usize;
        for (id, entity) in admitted {
            if entries.upsert(id, entity) {
                replaced += 1;
            }
        }
        let total = entries.items.len();
        drop(entries);

        tracing::debug!(
            target: "memrepo::storage",
            count,
            replaced,
            cleared,
            total,
            "batch ingested"
        );
        count
    }

    /// Replace the whole contents with `entities`
    pub fn replace_all(&self, entities: impl IntoIterator<Item = impl Into<Arc<E>>>) -> usize {
        self.ingest_all(entities, true)
    }

    /// Remove every entity; returns the number removed
    pub fn clear(&self) -> usize {
        let removed = self.entries.write().clear();
        tracing::debug!(target: "memrepo::storage", removed, "repository cleared");
        removed
    }

    /// Remove the entities matching `filters` (all of them for `None`)
    ///
    /// Survivors keep their relative order. Nothing is removed if evaluation
    /// fails part way.
    pub fn remove(&self, filters: Option<&FilterSet>) -> RepoResult<usize> {
        let mut entries = self.entries.write();
        if entries.items.is_empty() {
            return Ok(0);
        }
        let predicate = Predicate::compile(&self.schema, filters)?;
        let mut marks = Vec::with_capacity(entries.items.len());
        for entity in &entries.items {
            marks.push(predicate.matches(entity)?);
        }
        let removed = entries.remove_marked(&marks);
        drop(entries);

        tracing::debug!(target: "memrepo::storage", removed, "entities removed");
        Ok(removed)
    }

    /// Edit the first entity matching `filters` in place
    ///
    /// The lookup, the edit and the store happen under one write lock, so
    /// no concurrent ingest can slip in between. `action` runs while the
    /// lock is held and must not call back into this repository.
    ///
    /// If `action` changes the identity and the new identity belongs to
    /// another stored entity, that entity is dropped.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing matches
    /// - any filter compilation or evaluation error
    pub fn modify_first<F>(&self, filters: Option<&FilterSet>, action: F) -> RepoResult<Arc<E>>
    where
        F: FnOnce(&mut E),
    {
        let mut entries = self.entries.write();
        let position = if entries.items.is_empty() {
            None
        } else {
            let predicate = Predicate::compile(&self.schema, filters)?;
            entries.first_position(&predicate)?
        };
        let pos = position.ok_or_else(|| RepoError::not_found("no entity matches the filters"))?;

        let mut edited = E::clone(&entries.items[pos]);
        action(&mut edited);
        let edited = Arc::new(edited);
        entries.replace(vec![(pos, Arc::clone(&edited))]);
        drop(entries);

        tracing::debug!(target: "memrepo::storage", position = pos, "entity modified");
        Ok(self.hand_out(edited))
    }

    /// Set `field` to `value` on every entity matching `filters`
    ///
    /// All edits are prepared before any is stored: if the setter rejects
    /// the value, the repository is unchanged. Returns the number updated.
    ///
    /// # Errors
    ///
    /// - `FieldNotFound` / `ReadOnlyField` for an unknown or read-only field
    /// - `TypeMismatch` if the setter rejects the value
    pub fn assign(&self, filters: Option<&FilterSet>, field: &str, value: Value) -> RepoResult<usize> {
        let accessor = self.schema.accessor(field)?;
        if !accessor.is_writable() {
            return Err(RepoError::ReadOnlyField {
                field: field.to_string(),
            });
        }

        let mut entries = self.entries.write();
        if entries.items.is_empty() {
            return Ok(0);
        }
        let predicate = Predicate::compile(&self.schema, filters)?;
        let positions = entries.matching_positions(&predicate)?;

        let mut updates = Vec::with_capacity(positions.len());
        for pos in positions {
            let mut edited = E::clone(&entries.items[pos]);
            accessor.set(&mut edited, value.clone())?;
            updates.push((pos, Arc::new(edited)));
        }
        let updated = updates.len();
        entries.replace(updates);
        drop(entries);

        tracing::debug!(target: "memrepo::storage", field, updated, "field assigned");
        Ok(updated)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Count the entities matching `filters` (all of them for `None`)
    ///
    /// An empty repository answers 0 without looking at `filters`.
    pub fn instant_count(&self, filters: Option<&FilterSet>) -> RepoResult<usize> {
        let entries = self.entries.read();
        if entries.items.is_empty() {
            return Ok(0);
        }
        let predicate = Predicate::compile(&self.schema, filters)?;
        if predicate.is_always_true() {
            return Ok(entries.items.len());
        }
        let mut count = 0;
        for entity in &entries.items {
            if predicate.matches(entity)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Fetch the entities matching `filters`, in store order unless `sorts` is given
    ///
    /// Returns an empty vector (not an error) when nothing matches. The
    /// result always has `instant_count(filters)` elements for the same
    /// snapshot.
    pub fn instant_fetch(
        &self,
        filters: Option<&FilterSet>,
        sorts: Option<&SortSpec>,
    ) -> RepoResult<Vec<Arc<E>>> {
        let mut snapshot = self.snapshot(filters)?;
        if let Some(spec) = sorts {
            if !snapshot.is_empty() {
                spec.apply(&self.schema, &mut snapshot)?;
            }
        }
        Ok(snapshot
            .into_iter()
            .map(|entity| self.hand_out(entity))
            .collect())
    }

    /// Fetch the first entity in result order, if any
    pub fn instant_first(
        &self,
        filters: Option<&FilterSet>,
        sorts: Option<&SortSpec>,
    ) -> RepoResult<Option<Arc<E>>> {
        let first = match sorts.filter(|spec| !spec.is_empty()) {
            Some(spec) => {
                let mut snapshot = self.snapshot(filters)?;
                if !snapshot.is_empty() {
                    spec.apply(&self.schema, &mut snapshot)?;
                }
                snapshot.into_iter().next()
            }
            None => {
                let entries = self.entries.read();
                if entries.items.is_empty() {
                    None
                } else {
                    let predicate = Predicate::compile(&self.schema, filters)?;
                    entries
                        .first_position(&predicate)?
                        .map(|pos| Arc::clone(&entries.items[pos]))
                }
            }
        };
        Ok(first.map(|entity| self.hand_out(entity)))
    }

    /// Matching entities as shared references, taken under one read lock
    fn snapshot(&self, filters: Option<&FilterSet>) -> RepoResult<Vec<Arc<E>>> {
        let entries = self.entries.read();
        if entries.items.is_empty() {
            return Ok(Vec::new());
        }
        let predicate = Predicate::compile(&self.schema, filters)?;
        if predicate.is_always_true() {
            return Ok(entries.items.clone());
        }
        let mut matched = Vec::new();
        for entity in &entries.items {
            if predicate.matches(entity)? {
                matched.push(Arc::clone(entity));
            }
        }
        Ok(matched)
    }

    /// Apply the ingest side of the copy policy
    fn admit(&self, mut entity: Arc<E>) -> Arc<E> {
        // A uniquely owned Arc is already private to the repository
        if self.options.copy_policy.copies_on_ingest() && Arc::get_mut(&mut entity).is_none() {
            entity = Arc::new(E::clone(&entity));
        }
        entity
    }

    /// Apply the fetch side of the copy policy
    fn hand_out(&self, entity: Arc<E>) -> Arc<E> {
        if self.options.copy_policy.copies_on_fetch() {
            Arc::new(E::clone(&entity))
        } else {
            entity
        }
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for InMemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("len", &self.len())
            .field("copy_policy", &self.options.copy_policy)
            .field("schema", &self.schema)
            .finish()
    }
}
