//! Operator types for version constraints

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::constraint::VersionError;

/// Comparison operators accepted in a dependency version string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (`==`, `=`, `eq`)
    Equal,
    /// Less than (`<`, `lt`)
    LessThan,
    /// Less than or equal (`<=`, `le`)
    LessThanOrEqual,
    /// Greater than (`>`, `gt`)
    GreaterThan,
    /// Greater than or equal (`>=`, `ge`)
    GreaterThanOrEqual,
    /// Not equal (`!=`, `<>`, `ne`)
    NotEqual,
}

impl Operator {
    /// Get the canonical string representation of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::NotEqual => "!=",
        }
    }

    /// Get all supported operator tokens
    pub fn supported_operators() -> &'static [&'static str] {
        &[
            "<", "lt", "<=", "le", ">", "gt", ">=", "ge", "==", "=", "eq", "!=", "<>", "ne",
        ]
    }

    /// Check whether the ordering of `actual` relative to `required` satisfies this operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::GreaterThanOrEqual
    }
}

impl FromStr for Operator {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "=" | "eq" => Ok(Operator::Equal),
            "<" | "lt" => Ok(Operator::LessThan),
            "<=" | "le" => Ok(Operator::LessThanOrEqual),
            ">" | "gt" => Ok(Operator::GreaterThan),
            ">=" | "ge" => Ok(Operator::GreaterThanOrEqual),
            "!=" | "<>" | "ne" => Ok(Operator::NotEqual),
            _ => Err(VersionError::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
