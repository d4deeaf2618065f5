//! `/<namespace>/<controller>/<action>/<key>/<value>...` routes bound to a
//! single namespace literal.

use serde::Deserialize;

use crate::convention::{Convention, PrefixRule};
use crate::error::{Result, RouterError};
use crate::params::Params;
use crate::route::{AssembleOptions, Route};
use crate::route_match::RouteMatch;

const NAMESPACE_KEY: &str = "namespace";

/// Options accepted by [`NamespaceRoute::new`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamespaceRouteOptions {
    pub namespace: String,
    pub defaults: Params,
}

/// Convention route whose first segment must equal its namespace.
///
/// ```
/// use trellis_router::{params, NamespaceRoute, NamespaceRouteOptions, Route};
///
/// let route = NamespaceRoute::new(NamespaceRouteOptions {
///     namespace: "application".to_string(),
///     defaults: params([("controller", "index"), ("action", "index")]),
/// });
///
/// let m = route.match_path("/application/blog", None).unwrap();
/// assert_eq!(m.get_str("controller"), Some("blog"));
/// assert_eq!(m.get_str("action"), Some("index"));
/// ```
#[derive(Debug, Clone)]
pub struct NamespaceRoute {
    engine: Convention,
}

impl NamespaceRoute {
    pub fn new(options: NamespaceRouteOptions) -> Self {
        log::debug!("Namespace route for \"{}\"", options.namespace);
        Self {
            engine: Convention::new(
                NAMESPACE_KEY,
                PrefixRule::Literal(options.namespace),
                options.defaults,
            ),
        }
    }

    pub fn from_options(options: &serde_json::Value) -> Result<Self> {
        if !options.is_object() {
            return Err(RouterError::invalid_configuration("Options must be an object"));
        }
        if !options.get("namespace").is_some_and(|n| n.is_string()) {
            return Err(RouterError::invalid_configuration("Namespace not defined nor a string"));
        }
        if !options.get("defaults").is_some_and(|d| d.is_object()) {
            return Err(RouterError::invalid_configuration("Defaults not defined nor an object"));
        }

        let options = NamespaceRouteOptions::deserialize(options)
            .map_err(|e| RouterError::invalid_configuration(e.to_string()))?;
        Ok(Self::new(options))
    }

    pub fn namespace(&self) -> &str {
        match self.engine.rule() {
            PrefixRule::Literal(namespace) => namespace,
            PrefixRule::OneOf(_) => "",
        }
    }
}

impl Route for NamespaceRoute {
    fn match_path(&self, path: &str, path_offset: Option<usize>) -> Option<RouteMatch> {
        self.engine.match_path(path, path_offset)
    }

    fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        last_match: Option<&RouteMatch>,
    ) -> Result<String> {
        self.engine.assemble(params, options, last_match)
    }

    fn defaults(&self) -> &Params {
        self.engine.defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::params;
    use serde_json::json;

    fn route() -> NamespaceRoute {
        NamespaceRoute::from_options(&json!({
            "namespace": "application",
            "defaults": {"controller": "index", "action": "index"}
        }))
        .unwrap()
    }

    #[test]
    fn test_from_options_rejects_bad_input() {
        let cases = [
            json!([]),
            json!({"defaults": {}}),
            json!({"namespace": 1, "defaults": {}}),
            json!({"namespace": "application"}),
            json!({"namespace": "application", "defaults": []}),
        ];

        for options in cases {
            assert!(
                matches!(
                    NamespaceRoute::from_options(&options),
                    Err(RouterError::InvalidConfiguration { .. })
                ),
                "{} should be rejected",
                options
            );
        }
    }

    #[test]
    fn test_namespace() {
        assert_eq!(route().namespace(), "application");
    }

    #[test]
    fn test_match() {
        let r = route();

        let m = r.match_path("application/index", None).unwrap();
        assert_eq!(m.get_str("namespace"), Some("application"));
        assert_eq!(m.get_str("controller"), Some("index"));
        assert_eq!(m.get_str("action"), Some("index"));

        assert!(r.match_path("test/foo/bar", None).is_none());
    }

    #[test]
    fn test_round_trip() {
        let r = route();
        let options = AssembleOptions::default();

        for input in [
            params([("namespace", "application")]),
            params([("namespace", "application"), ("controller", "blog")]),
            params([("namespace", "application"), ("controller", "blog"), ("action", "read"), ("id", "5")]),
        ] {
            let url = r.assemble(&input, &options, None).unwrap();
            let m = r.match_path(&url, None).unwrap();
            for (key, value) in &input {
                assert_eq!(m.get_param(key), Some(value), "{} after {}", key, url);
            }
        }
    }
}
