//! Version constraints for module dependency declarations
//!
//! This crate parses the `"<op><version>"` strings modules use to declare
//! dependencies (`">=5.3.3"`, `"ge1.0"`, `"2.1"`) and evaluates them against
//! actual versions using PHP-style `version_compare` ordering.

mod compare;
mod constraint;
mod operator;

pub use compare::{compare, version_compare};
pub use constraint::{validate_version, VersionConstraint, VersionError};
pub use operator::Operator;
