//! Sort specifications
//!
//! A [`SortSpec`] orders query results by one or more fields, applied as a
//! lexicographic, stable multi-key sort. Null values sort after all non-null
//! values ascending and before them descending. Every non-null value in a key
//! column must be ordered against every other, or the sort fails with
//! `TypeMismatch` before any reordering happens.

use memrepo_core::{Entity, FieldAccessor, RepoError, RepoResult, Schema, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Field name, resolved against the entity schema
    pub field: String,
    /// Direction
    #[serde(default)]
    pub dir: SortDir,
}

impl Sort {
    /// Ascending sort on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            dir: SortDir::Asc,
        }
    }

    /// Descending sort on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            dir: SortDir::Desc,
        }
    }
}

/// Ordered list of sort keys; earlier keys take precedence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    sorts: Vec<Sort>,
}

impl SortSpec {
    /// Empty spec (keeps store order)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sort key (builder pattern)
    pub fn add_sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Sort keys in precedence order
    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// Check if the spec has no keys
    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    /// Sort `items` in place
    ///
    /// # Errors
    ///
    /// - `FieldNotFound` if a key names an unregistered field
    /// - `TypeMismatch` if a key column mixes values with no mutual ordering
    pub fn apply<E, T>(&self, schema: &Schema<E>, items: &mut Vec<T>) -> RepoResult<()>
    where
        E: Entity,
        T: AsRef<E>,
    {
        if self.sorts.is_empty() || items.len() < 2 {
            // Field names are still resolved so a bad spec fails consistently
            for sort in &self.sorts {
                schema.accessor(&sort.field)?;
            }
            return Ok(());
        }

        let accessors = self
            .sorts
            .iter()
            .map(|sort| schema.accessor(&sort.field))
            .collect::<RepoResult<Vec<&FieldAccessor<E>>>>()?;

        let keys: Vec<Vec<Value>> = items
            .iter()
            .map(|item| accessors.iter().map(|a| a.get(item.as_ref())).collect())
            .collect();

        for (column, sort) in self.sorts.iter().enumerate() {
            check_column(&sort.field, keys.iter().map(|row| &row[column]))?;
        }

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| {
            for (column, sort) in self.sorts.iter().enumerate() {
                let ordering = compare_keys(&keys[a][column], &keys[b][column], sort.dir);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
        items.extend(order.into_iter().filter_map(|i| slots[i].take()));
        Ok(())
    }
}

impl From<Sort> for SortSpec {
    fn from(sort: Sort) -> Self {
        SortSpec { sorts: vec![sort] }
    }
}

impl FromIterator<Sort> for SortSpec {
    fn from_iter<I: IntoIterator<Item = Sort>>(iter: I) -> Self {
        SortSpec {
            sorts: iter.into_iter().collect(),
        }
    }
}

/// Every non-null value must be ordered against the first non-null one.
///
/// Ordering groups (numbers, text, timestamps, booleans) are closed, so
/// checking against one representative covers every pair.
fn check_column<'a>(field: &str, mut values: impl Iterator<Item = &'a Value>) -> RepoResult<()> {
    let Some(first) = values.by_ref().find(|v| !v.is_null()) else {
        return Ok(());
    };
    for value in values.filter(|v| !v.is_null()) {
        if first.natural_cmp(value).is_none() || value.natural_cmp(first).is_none() {
            return Err(RepoError::type_mismatch(
                field,
                first.type_name(),
                value.type_name(),
            ));
        }
    }
    Ok(())
}

fn compare_keys(a: &Value, b: &Value, dir: SortDir) -> Ordering {
    let ascending = match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.natural_cmp(b).unwrap_or(Ordering::Equal),
    };
    match dir {
        SortDir::Asc => ascending,
        SortDir::Desc => ascending.reverse(),
    }
}
