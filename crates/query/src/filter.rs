//! Filters and filter sets
//!
//! A [`Filter`] is a (field, check, operand) triple. A [`FilterSet`] is an
//! ordered conjunction of filters; the empty set matches everything.

use crate::check::Check;
use memrepo_core::{RepoResult, Value};
use serde::{Deserialize, Serialize};

/// One field predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field name, resolved against the entity schema
    pub field: String,
    /// Comparison operator
    pub check: Check,
    /// Operand; `Null` for the null checks, a `List` for `In`
    #[serde(default)]
    pub operand: Value,
}

impl Filter {
    /// Create a filter
    pub fn new(field: impl Into<String>, check: Check, operand: impl Into<Value>) -> Self {
        Filter {
            field: field.into(),
            check,
            operand: operand.into(),
        }
    }

    /// Create a filter from an operator name
    ///
    /// # Errors
    ///
    /// `UnsupportedOperator` if `check` is not a known operator name.
    pub fn parse(
        field: impl Into<String>,
        check: &str,
        operand: impl Into<Value>,
    ) -> RepoResult<Self> {
        Ok(Filter::new(field, check.parse()?, operand))
    }

    /// `field == operand`
    pub fn eq(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Filter::new(field, Check::Equal, operand)
    }

    /// `field != operand`
    pub fn ne(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Filter::new(field, Check::NotEqual, operand)
    }

    /// `field > operand`
    pub fn gt(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Filter::new(field, Check::Greater, operand)
    }

    /// `field >= operand`
    pub fn ge(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Filter::new(field, Check::GreatOrEqual, operand)
    }

    /// `field < operand`
    pub fn lt(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Filter::new(field, Check::Lower, operand)
    }

    /// `field <= operand`
    pub fn le(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Filter::new(field, Check::LowerOrEqual, operand)
    }

    /// `field` equals any of `candidates`
    pub fn is_in<I, V>(field: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::new(
            field,
            Check::In,
            Value::List(candidates.into_iter().map(Into::into).collect()),
        )
    }

    /// `field` is null
    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::new(field, Check::IsNull, Value::Null)
    }

    /// `field` is not null
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::new(field, Check::IsNotNull, Value::Null)
    }
}

/// Conjunction of filters
///
/// # Example
///
/// ```
/// use memrepo_query::{Filter, FilterSet};
///
/// let filters = FilterSet::new()
///     .add_filter(Filter::is_not_null("name"))
///     .add_filter(Filter::ge("weight", 4));
/// assert_eq!(filters.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Create an empty filter set (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter (builder pattern)
    pub fn add_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append a filter (mutating)
    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Filters in evaluation order
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Iterate filters in evaluation order
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if the set has no filters
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl From<Filter> for FilterSet {
    fn from(filter: Filter) -> Self {
        FilterSet {
            filters: vec![filter],
        }
    }
}

impl From<Vec<Filter>> for FilterSet {
    fn from(filters: Vec<Filter>) -> Self {
        FilterSet { filters }
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        FilterSet {
            filters: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
