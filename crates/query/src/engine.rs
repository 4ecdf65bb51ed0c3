//! Filter evaluation
//!
//! A [`FilterSet`] is compiled against an entity [`Schema`] into a
//! [`Predicate`]: field names are resolved to accessors and operands are
//! checked for shape once, before any entity is visited. Evaluating the
//! predicate is then a pure function of the entity.
//!
//! # Semantics
//!
//! | Check | Null field | Non-null field |
//! |-------|------------|----------------|
//! | `IsNull` / `IsNotNull` | true / false | false / true |
//! | `Equal` / `NotEqual` | natural equality with operand | natural equality with operand |
//! | `In` | no match | naturally equal to any candidate |
//! | ordering | no match | natural ordering, `TypeMismatch` if undefined |

use crate::check::Check;
use crate::filter::{Filter, FilterSet};
use memrepo_core::{Entity, FieldAccessor, RepoError, RepoResult, Schema, Value};
use std::cmp::Ordering;

/// A filter whose field has been resolved
struct CompiledFilter<'a, E> {
    accessor: &'a FieldAccessor<E>,
    filter: &'a Filter,
}

impl<E> CompiledFilter<'_, E> {
    fn matches(&self, entity: &E) -> RepoResult<bool> {
        let value = self.accessor.get(entity);
        evaluate(self.filter, &value)
    }
}

/// Conjunctive predicate compiled from a filter set
pub struct Predicate<'a, E> {
    filters: Vec<CompiledFilter<'a, E>>,
}

impl<'a, E: Entity> Predicate<'a, E> {
    /// Compile a filter set; `None` compiles to the always-true predicate
    ///
    /// # Errors
    ///
    /// - `FieldNotFound` if a filter names an unregistered field
    /// - `InvalidOperand` if an operand does not fit its check
    pub fn compile(schema: &'a Schema<E>, filters: Option<&'a FilterSet>) -> RepoResult<Self> {
        let filters = match filters {
            Some(set) => set
                .iter()
                .map(|filter| {
                    validate_operand(filter)?;
                    Ok(CompiledFilter {
                        accessor: schema.accessor(&filter.field)?,
                        filter,
                    })
                })
                .collect::<RepoResult<Vec<_>>>()?,
            None => Vec::new(),
        };
        tracing::trace!(target: "memrepo::query", filters = filters.len(), "filter set compiled");
        Ok(Predicate { filters })
    }

    /// Check whether every filter matches (vacuously true when empty)
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if an ordering check meets a field value that has no
    /// ordering against the operand.
    pub fn matches(&self, entity: &E) -> RepoResult<bool> {
        for filter in &self.filters {
            if !filter.matches(entity)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Check whether this predicate accepts everything
    pub fn is_always_true(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Evaluate a filter set against one entity
///
/// Convenience for one-off checks; repositories compile once per query.
pub fn matches<E: Entity>(
    schema: &Schema<E>,
    entity: &E,
    filters: Option<&FilterSet>,
) -> RepoResult<bool> {
    Predicate::compile(schema, filters)?.matches(entity)
}

/// Reject operands whose shape cannot fit the check
fn validate_operand(filter: &Filter) -> RepoResult<()> {
    let invalid = |reason: &str| -> RepoResult<()> {
        Err(RepoError::invalid_operand(
            filter.field.clone(),
            filter.check.as_str(),
            reason,
        ))
    };
    match filter.check {
        // Null checks ignore the operand, whatever its shape
        check if check.is_null_check() => Ok(()),
        Check::In if filter.operand.as_list().is_none() => invalid("operand must be a list"),
        check if check.is_ordering() => match filter.operand {
            Value::Null => invalid("operand must not be null"),
            Value::List(_) => invalid("operand must be a scalar"),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

/// Apply one filter to a field value
pub fn evaluate(filter: &Filter, value: &Value) -> RepoResult<bool> {
    let operand = &filter.operand;
    match filter.check {
        Check::IsNull => Ok(value.is_null()),
        Check::IsNotNull => Ok(!value.is_null()),
        Check::Equal => Ok(value.natural_eq(operand)),
        Check::NotEqual => Ok(!value.natural_eq(operand)),
        Check::In => {
            if value.is_null() {
                return Ok(false);
            }
            let candidates = operand.as_list().ok_or_else(|| {
                RepoError::invalid_operand(filter.field.clone(), "in", "operand must be a list")
            })?;
            Ok(candidates.iter().any(|c| value.natural_eq(c)))
        }
        Check::Greater => Ok(compare(filter, value)?.map_or(false, Ordering::is_gt)),
        Check::GreatOrEqual => Ok(compare(filter, value)?.map_or(false, Ordering::is_ge)),
        Check::Lower => Ok(compare(filter, value)?.map_or(false, Ordering::is_lt)),
        Check::LowerOrEqual => Ok(compare(filter, value)?.map_or(false, Ordering::is_le)),
    }
}

/// Order a field value against the filter operand; `None` for a null field
fn compare(filter: &Filter, value: &Value) -> RepoResult<Option<Ordering>> {
    if value.is_null() {
        return Ok(None);
    }
    value
        .natural_cmp(&filter.operand)
        .map(Some)
        .ok_or_else(|| {
            RepoError::type_mismatch(
                filter.field.clone(),
                filter.operand.type_name(),
                value.type_name(),
            )
        })
}
