//! Path routing for Trellis applications
//!
//! Three route strategies share the [`Route`] contract:
//!
//! - [`PatternRoute`]: `/blog/:controller/:action/*` patterns with
//!   requirement regexes and wildcard `key/value` tails
//! - [`NamespaceRoute`]: `/<namespace>/<controller>/<action>/<key>/<value>`
//! - [`ModuleRoute`]: the same convention keyed by a registered module name
//!
//! Every route can turn a path into a [`RouteMatch`] and turn parameters
//! back into a path. Routes are immutable after construction; the match a
//! request produced is passed back explicitly when assembling links.

mod convention;
mod definition;
mod error;
mod module;
mod namespace;
mod params;
mod pattern;
mod route;
mod route_match;
mod stack;

pub use definition::RouteDefinition;
pub use error::{Result, RouterError};
pub use module::{ModuleList, ModuleRoute, ModuleRouteOptions};
pub use namespace::{NamespaceRoute, NamespaceRouteOptions};
pub use params::{params, ParamValue, Params};
pub use pattern::{PatternRoute, PatternRouteOptions};
pub use route::{AssembleOptions, Route};
pub use route_match::RouteMatch;
pub use stack::RouteStack;
