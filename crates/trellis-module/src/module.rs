//! The capability contract every application module implements.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manager::ModuleManager;

/// A dependency declared by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Constraint such as `">=5.3.3"` or `"ge1.0"`.
    pub version: String,
    /// Absent means optional.
    #[serde(default)]
    pub required: bool,
}

impl Dependency {
    pub fn required(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            required: true,
        }
    }

    pub fn optional(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            required: false,
        }
    }
}

/// A capability a module offers to others, e.g. `{"name": "blog", "version": "1.2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provides {
    pub name: String,
    pub version: String,
}

impl Provides {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// An application module.
///
/// Every method has a no-op default, so a module only implements the hooks
/// it needs.
///
/// Dependency keys are either `php` (the runtime), `ext/<name>` (a runtime
/// extension) or the name another module [`provides`](Module::provides).
pub trait Module: Send + Sync {
    /// Called once, right after the module is created.
    fn init(&self, _manager: &ModuleManager) -> Result<()> {
        Ok(())
    }

    /// Configuration fragment for `application_env`. Must be a JSON object.
    fn config(&self, _application_env: &str) -> Option<serde_json::Value> {
        None
    }

    fn dependencies(&self) -> IndexMap<String, Dependency> {
        IndexMap::new()
    }

    fn provides(&self) -> Option<Provides> {
        None
    }
}
