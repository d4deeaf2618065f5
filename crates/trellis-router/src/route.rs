//! The contract shared by every route strategy.

use serde::Deserialize;
use std::fmt;

use crate::error::Result;
use crate::params::Params;
use crate::route_match::RouteMatch;

/// Flags controlling how a route builds a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssembleOptions {
    /// Percent-encode every emitted segment.
    pub encode: bool,
    /// Ignore the values of the previous match.
    pub reset: bool,
    /// The route is chained after another one: keep default-valued trailing
    /// segments so the result stays positionally unambiguous.
    pub path_offset: bool,
}

impl AssembleOptions {
    pub fn encoded() -> Self {
        Self {
            encode: true,
            ..Default::default()
        }
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    pub fn with_path_offset(mut self, path_offset: bool) -> Self {
        self.path_offset = path_offset;
        self
    }
}

/// A route maps a request path to named parameters and back.
///
/// Routes are immutable once built and keep no per-request state, so a
/// single instance can serve concurrent requests.
pub trait Route: Send + Sync + fmt::Debug {
    /// Match a path. `path_offset` is the byte position where this route
    /// starts reading when it is chained after another route's partial match.
    ///
    /// Returns `None` when the path does not match; that is not an error.
    fn match_path(&self, path: &str, path_offset: Option<usize>) -> Option<RouteMatch>;

    /// Build a path from `params`, falling back to the values of
    /// `last_match` and then to the route defaults.
    fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        last_match: Option<&RouteMatch>,
    ) -> Result<String>;

    /// Default parameter values declared for this route.
    fn defaults(&self) -> &Params;
}

/// Slice `path` for a route that starts reading at `offset`.
///
/// Returns `None` when the offset is past the end or not on a character
/// boundary. A single leading delimiter is skipped since the previous route
/// stops right before it.
pub(crate) fn remaining_path(path: &str, offset: usize) -> Option<(&str, usize)> {
    let rest = path.get(offset..)?;
    match rest.strip_prefix('/') {
        Some(stripped) => Some((stripped, 1)),
        None => Some((rest, 0)),
    }
}
