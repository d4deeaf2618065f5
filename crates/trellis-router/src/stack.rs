//! Ordered collection of named routes.

use indexmap::IndexMap;

use crate::definition::RouteDefinition;
use crate::error::{Result, RouterError};
use crate::module::ModuleList;
use crate::params::Params;
use crate::route::{AssembleOptions, Route};
use crate::route_match::RouteMatch;

/// Routes tried in registration order; the first one that matches wins.
#[derive(Debug, Default)]
pub struct RouteStack {
    routes: IndexMap<String, Box<dyn Route>>,
}

impl RouteStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from an object of `{ "<name>": <definition>, ... }`.
    pub fn from_config(config: &serde_json::Value, modules: &ModuleList) -> Result<Self> {
        let definitions = config
            .as_object()
            .ok_or_else(|| RouterError::invalid_configuration("Routes must be an object"))?;

        let mut stack = Self::new();
        for (name, definition) in definitions {
            let definition = RouteDefinition::from_value(definition).map_err(|e| match e {
                RouterError::InvalidConfiguration { message } => RouterError::invalid_configuration(
                    format!("Route \"{}\": {}", name, message),
                ),
                other => other,
            })?;
            stack.add_route(name.clone(), definition.build(modules)?);
        }
        Ok(stack)
    }

    /// Register a route. A route already registered under `name` is
    /// replaced and keeps its position.
    pub fn add_route(&mut self, name: impl Into<String>, route: Box<dyn Route>) -> &mut Self {
        let name = name.into();
        log::debug!("Adding route \"{}\"", name);
        self.routes.insert(name, route);
        self
    }

    pub fn remove_route(&mut self, name: &str) -> Option<Box<dyn Route>> {
        self.routes.shift_remove(name)
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn get_route(&self, name: &str) -> Option<&dyn Route> {
        self.routes.get(name).map(|r| r.as_ref())
    }

    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match `path` against each route in turn.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        for (name, route) in &self.routes {
            if let Some(m) = route.match_path(path, None) {
                log::trace!("Path \"{}\" matched route \"{}\"", path, name);
                return Some(m.with_route_name(name.clone()));
            }
        }
        log::trace!("No route matched \"{}\"", path);
        None
    }

    /// Assemble a path with the route registered under `name`.
    pub fn assemble(
        &self,
        name: &str,
        params: &Params,
        options: &AssembleOptions,
        last_match: Option<&RouteMatch>,
    ) -> Result<String> {
        let route = self.routes.get(name).ok_or_else(|| RouterError::RouteNotFound {
            name: name.to_string(),
        })?;

        // A match produced by another route carries values that mean nothing here.
        let last_match = last_match.filter(|m| m.route_name().map_or(true, |n| n == name));
        route.assemble(params, options, last_match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{NamespaceRoute, NamespaceRouteOptions};
    use crate::params::params;
    use crate::pattern::{PatternRoute, PatternRouteOptions};

    fn stack() -> RouteStack {
        let mut stack = RouteStack::new();
        stack
            .add_route(
                "newsletter",
                Box::new(
                    PatternRoute::new(PatternRouteOptions::new(
                        "/newsletter/r/:hash",
                        Params::new(),
                    ))
                    .unwrap(),
                ),
            )
            .add_route(
                "default",
                Box::new(NamespaceRoute::new(NamespaceRouteOptions {
                    namespace: "application".to_string(),
                    defaults: params([("controller", "index"), ("action", "index")]),
                })),
            );
        stack
    }

    #[test]
    fn test_registration() {
        let mut stack = stack();
        assert_eq!(stack.len(), 2);
        assert!(stack.has_route("default"));
        assert_eq!(stack.route_names().collect::<Vec<_>>(), vec!["newsletter", "default"]);

        assert!(stack.remove_route("newsletter").is_some());
        assert!(!stack.has_route("newsletter"));
        assert!(stack.remove_route("newsletter").is_none());
        assert!(stack.get_route("default").is_some());
    }

    #[test]
    fn test_match_falls_through() {
        let stack = stack();

        let m = stack.match_path("/newsletter/r/abc123").unwrap();
        assert_eq!(m.route_name(), Some("newsletter"));
        assert_eq!(m.get_str("hash"), Some("abc123"));

        let m = stack.match_path("/application/blog").unwrap();
        assert_eq!(m.route_name(), Some("default"));

        assert!(stack.match_path("/unknown").is_none());
        assert!(RouteStack::new().match_path("/").is_none());
    }

    #[test]
    fn test_assemble_by_name() {
        let stack = stack();
        let options = AssembleOptions::default();

        assert_eq!(
            stack
                .assemble("newsletter", &params([("hash", "abc123")]), &options, None)
                .unwrap(),
            "/newsletter/r/abc123"
        );

        let err = stack
            .assemble("missing", &Params::new(), &options, None)
            .unwrap_err();
        assert!(matches!(err, RouterError::RouteNotFound { ref name } if name == "missing"));
    }

    #[test]
    fn test_assemble_ignores_foreign_match() {
        let stack = stack();
        let m = stack.match_path("/application/blog/read").unwrap();

        let err = stack
            .assemble("newsletter", &Params::new(), &AssembleOptions::default(), Some(&m))
            .unwrap_err();
        assert!(matches!(err, RouterError::MissingRouteParameter { .. }));

        let url = stack
            .assemble("default", &params([("action", "edit")]), &AssembleOptions::default(), Some(&m))
            .unwrap();
        assert_eq!(url, "/application/blog/edit");
    }
}
