//! Comparison operators

use memrepo_core::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison applied by a filter to one field
///
/// Parsed from its wire name (`"eq"`, `"ge"`, `"in"`, ...) or the symbolic
/// form (`"="`, `">="`, ...). Unknown names are `UnsupportedOperator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Check {
    /// Field equals operand
    Equal,
    /// Field does not equal operand
    NotEqual,
    /// Field is ordered after operand
    Greater,
    /// Field is ordered at or after operand
    GreatOrEqual,
    /// Field is ordered before operand
    Lower,
    /// Field is ordered at or before operand
    LowerOrEqual,
    /// Field equals one of the operand's list elements
    In,
    /// Field is null; operand ignored
    IsNull,
    /// Field is not null; operand ignored
    IsNotNull,
}

impl Check {
    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Check::Equal => "eq",
            Check::NotEqual => "ne",
            Check::Greater => "gt",
            Check::GreatOrEqual => "ge",
            Check::Lower => "lt",
            Check::LowerOrEqual => "le",
            Check::In => "in",
            Check::IsNull => "is_null",
            Check::IsNotNull => "is_not_null",
        }
    }

    /// Whether this check compares with the field's natural ordering
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Check::Greater | Check::GreatOrEqual | Check::Lower | Check::LowerOrEqual
        )
    }

    /// Whether this check ignores its operand
    pub fn is_null_check(&self) -> bool {
        matches!(self, Check::IsNull | Check::IsNotNull)
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Check {
    type Err = RepoError;

    fn from_str(s: &str) -> RepoResult<Self> {
        match s {
            "eq" | "=" | "==" => Ok(Check::Equal),
            "ne" | "!=" | "<>" => Ok(Check::NotEqual),
            "gt" | ">" => Ok(Check::Greater),
            "ge" | ">=" => Ok(Check::GreatOrEqual),
            "lt" | "<" => Ok(Check::Lower),
            "le" | "<=" => Ok(Check::LowerOrEqual),
            "in" => Ok(Check::In),
            "is_null" => Ok(Check::IsNull),
            "is_not_null" => Ok(Check::IsNotNull),
            other => Err(RepoError::unsupported_operator(other)),
        }
    }
}

impl TryFrom<String> for Check {
    type Error = RepoError;

    fn try_from(s: String) -> RepoResult<Self> {
        s.parse()
    }
}

impl From<Check> for String {
    fn from(check: Check) -> Self {
        check.as_str().to_string()
    }
}
