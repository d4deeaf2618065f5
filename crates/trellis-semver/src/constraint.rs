//! Single version constraint implementation

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::compare::compare;
use crate::Operator;

/// Error type for constraint and version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Malformed version string \"{0}\"")]
    MalformedVersion(String),
    #[error("Invalid operator \"{0}\"")]
    InvalidOperator(String),
}

lazy_static! {
    // Operator tokens, longest first so "<=" is not read as "<"
    static ref CONSTRAINT_RE: Regex =
        Regex::new(r"^\s*(<=|<>|<|lt|le|>=|>|gt|ge|==|=|eq|!=|ne)?\s*(.*?)\s*$").unwrap();

    static ref VERSION_RE: Regex = Regex::new(r"^\d[0-9A-Za-z.+_-]*$").unwrap();
}

/// Check that a version string is something `version_compare` can order
/// meaningfully: it must start with a digit and use only alphanumerics and
/// the `.`, `-`, `_`, `+` separators.
pub fn validate_version(version: &str) -> Result<&str, VersionError> {
    if VERSION_RE.is_match(version) {
        Ok(version)
    } else {
        Err(VersionError::MalformedVersion(version.to_string()))
    }
}

/// A single version constraint such as `>=5.3.3` or `ne2.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    operator: Operator,
    version: String,
}

impl VersionConstraint {
    /// Create a constraint from an operator and a version
    pub fn new(operator: Operator, version: impl Into<String>) -> Result<Self, VersionError> {
        let version = version.into();
        validate_version(&version)?;
        Ok(Self { operator, version })
    }

    /// Parse a `"<op><version>"` string. A missing operator means `>=`.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let caps = CONSTRAINT_RE
            .captures(raw)
            .ok_or_else(|| VersionError::MalformedVersion(raw.to_string()))?;

        let operator = match caps.get(1) {
            Some(op) => op.as_str().parse()?,
            None => Operator::default(),
        };
        let version = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        if validate_version(version).is_err() {
            return Err(VersionError::MalformedVersion(raw.to_string()));
        }

        Ok(Self {
            operator,
            version: version.to_string(),
        })
    }

    /// Get the operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Get the required version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Check whether `actual` satisfies this constraint
    pub fn satisfied_by(&self, actual: &str) -> Result<bool, VersionError> {
        let actual = validate_version(actual.trim())?;
        Ok(compare(actual, self.operator, &self.version))
    }
}

impl FromStr for VersionConstraint {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}
