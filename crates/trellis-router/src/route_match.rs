//! Result of a successful route match.

use crate::params::{ParamValue, Params};

/// Parameters produced by matching a path against a route.
///
/// A `RouteMatch` is read-only once built. Pass it back into
/// [`Route::assemble`](crate::Route::assemble) to reuse the matched values
/// when building a URL for the same request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteMatch {
    params: Params,
    captured: Params,
    wildcard: Params,
    length: usize,
    route_name: Option<String>,
}

impl RouteMatch {
    /// Create a match from the final parameter map.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Record the values captured from variable segments.
    pub fn with_captured(mut self, captured: Params) -> Self {
        self.captured = captured;
        self
    }

    /// Record the key/value pairs taken from a wildcard tail.
    pub fn with_wildcard(mut self, wildcard: Params) -> Self {
        self.wildcard = wildcard;
        self
    }

    /// Record how many bytes of the path the route consumed.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Attach the name the producing route was registered under.
    pub fn with_route_name(mut self, name: impl Into<String>) -> Self {
        self.route_name = Some(name.into());
        self
    }

    /// All parameters, including defaults.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Single-string parameter lookup.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(ParamValue::as_str)
    }

    pub fn captured(&self) -> &Params {
        &self.captured
    }

    pub fn wildcard(&self) -> &Params {
        &self.wildcard
    }

    /// Bytes of the path consumed, counted from the path offset.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}
