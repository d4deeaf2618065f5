//! Route descriptions that can live in configuration.
//!
//! ```json
//! {
//!     "type": "pattern",
//!     "options": {"route": "/blog/:id", "defaults": {"id": "1"}}
//! }
//! ```

use serde::Deserialize;

use crate::error::{Result, RouterError};
use crate::module::{ModuleList, ModuleRoute, ModuleRouteOptions};
use crate::namespace::{NamespaceRoute, NamespaceRouteOptions};
use crate::pattern::{PatternRoute, PatternRouteOptions};
use crate::route::Route;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum RouteDefinition {
    Pattern(PatternRouteOptions),
    Namespace(NamespaceRouteOptions),
    Module(ModuleRouteOptions),
}

impl RouteDefinition {
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| RouterError::invalid_configuration(e.to_string()))
    }

    /// The route type as written in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteDefinition::Pattern(_) => "pattern",
            RouteDefinition::Namespace(_) => "namespace",
            RouteDefinition::Module(_) => "module",
        }
    }

    /// Build the described route. `modules` is only read by module routes.
    pub fn build(self, modules: &ModuleList) -> Result<Box<dyn Route>> {
        Ok(match self {
            RouteDefinition::Pattern(options) => Box::new(PatternRoute::new(options)?),
            RouteDefinition::Namespace(options) => Box::new(NamespaceRoute::new(options)),
            RouteDefinition::Module(options) => Box::new(ModuleRoute::new(options, modules)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_definitions() {
        let pattern = RouteDefinition::from_value(&json!({
            "type": "pattern",
            "options": {"route": "/archive/:year", "defaults": {}, "reqs": {"year": "\\d+"}}
        }))
        .unwrap();
        assert_eq!(pattern.kind(), "pattern");

        let namespace = RouteDefinition::from_value(&json!({
            "type": "namespace",
            "options": {"namespace": "application", "defaults": {"controller": "index"}}
        }))
        .unwrap();
        assert_eq!(namespace.kind(), "namespace");

        let module = RouteDefinition::from_value(&json!({
            "type": "module",
            "options": {"defaults": {}}
        }))
        .unwrap();
        assert_eq!(module.kind(), "module");
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = RouteDefinition::from_value(&json!({"type": "regex", "options": {}})).unwrap_err();
        assert!(matches!(err, RouterError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(RouteDefinition::from_value(&json!({"type": "pattern", "options": {"route": "/a"}})).is_err());
        assert!(RouteDefinition::from_value(&json!({"type": "namespace", "options": {"defaults": {}}})).is_err());
    }

    #[test]
    fn test_build() {
        let route = RouteDefinition::from_value(&json!({
            "type": "module",
            "options": {"defaults": {"controller": "index", "action": "index"}}
        }))
        .unwrap()
        .build(&["Blog".to_string()])
        .unwrap();

        let m = route.match_path("/blog/post", None).unwrap();
        assert_eq!(m.get_str("controller"), Some("post"));
    }

    #[test]
    fn test_build_propagates_pattern_errors() {
        let err = RouteDefinition::from_value(&json!({
            "type": "pattern",
            "options": {"route": "/a/*/b", "defaults": {}}
        }))
        .unwrap()
        .build(&[])
        .unwrap_err();
        assert!(matches!(err, RouterError::InvalidConfiguration { .. }));
    }
}
