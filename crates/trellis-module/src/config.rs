//! The configuration tree built from every loaded module's fragment.

use serde_json::{Map, Value};

use crate::error::{ModuleError, Result};

/// Merged application configuration.
///
/// Fragments are merged in load order: objects merge key by key, arrays are
/// concatenated and any other value replaces the previous one. Once
/// [`finalize`](MergedConfig::finalize)d the tree is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    value: Value,
    locked: bool,
}

impl Default for MergedConfig {
    fn default() -> Self {
        Self {
            value: Value::Object(Map::new()),
            locked: false,
        }
    }
}

impl MergedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing tree, e.g. one restored from the cache.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ModuleError::Config(
                "merged configuration must be an object".to_string(),
            ));
        }
        Ok(Self {
            value,
            locked: false,
        })
    }

    /// Merge a fragment on top of the current tree.
    pub fn merge(&mut self, fragment: Value) -> Result<()> {
        if self.locked {
            return Err(ModuleError::ConfigLocked);
        }
        if !fragment.is_object() {
            return Err(ModuleError::Config(
                "configuration fragment must be an object".to_string(),
            ));
        }
        merge_values(&mut self.value, fragment);
        Ok(())
    }

    pub fn finalize(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Top-level entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// Nested lookup with a JSON pointer such as `/routes/default/type`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.value.pointer(pointer)
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

fn merge_values(base: &mut Value, fragment: Value) {
    match (base, fragment) {
        (Value::Object(base), Value::Object(fragment)) => {
            for (key, value) in fragment {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(fragment)) => base.extend(fragment),
        (base, fragment) => *base = fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_rules() {
        let mut config = MergedConfig::new();
        config
            .merge(json!({
                "db": {"host": "localhost", "port": 3306},
                "plugins": ["a"],
                "debug": false
            }))
            .unwrap();
        config
            .merge(json!({
                "db": {"port": 3307, "user": "app"},
                "plugins": ["b"],
                "debug": true,
                "routes": {}
            }))
            .unwrap();

        assert_eq!(
            config.as_value(),
            &json!({
                "db": {"host": "localhost", "port": 3307, "user": "app"},
                "plugins": ["a", "b"],
                "debug": true,
                "routes": {}
            })
        );
        assert_eq!(config.pointer("/db/user"), Some(&json!("app")));
        assert_eq!(config.get("debug"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_preserves_insertion_order() {
        let mut config = MergedConfig::new();
        config.merge(json!({"b": 1, "a": 2})).unwrap();
        config.merge(json!({"c": 3, "a": 4})).unwrap();

        let keys: Vec<_> = config.as_value().as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_rejects_non_objects() {
        let mut config = MergedConfig::new();
        assert!(matches!(config.merge(json!([1])), Err(ModuleError::Config(_))));
        assert!(MergedConfig::from_value(json!("x")).is_err());
    }

    #[test]
    fn test_finalized_config_is_read_only() {
        let mut config = MergedConfig::new();
        config.merge(json!({"a": 1})).unwrap();
        config.finalize();

        assert!(config.is_locked());
        assert!(matches!(config.merge(json!({"b": 2})), Err(ModuleError::ConfigLocked)));
        assert_eq!(config.into_value(), json!({"a": 1}));
    }
}
