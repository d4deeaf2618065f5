//! The runtime and extension versions `php` / `ext/<name>` dependencies are
//! checked against.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const RUNTIME_KEY: &str = "php";
const EXTENSION_PREFIX: &str = "ext/";

/// Host platform description.
///
/// Serialized as a flat map, the same keys modules use in their dependency
/// declarations:
///
/// ```json
/// {"php": "5.3.3", "ext/json": "1.2.1"}
/// ```
///
/// `ext-<name>` is accepted as an alias of `ext/<name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, String>", into = "IndexMap<String, String>")]
pub struct Platform {
    runtime_version: Option<String>,
    extensions: IndexMap<String, String>,
}

impl Platform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    pub fn with_extension(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.extensions.insert(name.into(), version.into());
        self
    }

    /// Apply `php` / `ext/<name>` overrides on top of this platform.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, version) in overrides {
            if key == RUNTIME_KEY {
                self.runtime_version = Some(version.clone());
            } else if let Some(name) = extension_name(key) {
                self.extensions.insert(name.to_string(), version.clone());
            } else {
                log::warn!("Ignoring unknown platform entry \"{}\"", key);
            }
        }
        self
    }

    pub fn runtime_version(&self) -> Option<&str> {
        self.runtime_version.as_deref()
    }

    pub fn extension_version(&self, name: &str) -> Option<&str> {
        self.extensions.get(name).map(String::as_str)
    }

    pub fn extensions(&self) -> &IndexMap<String, String> {
        &self.extensions
    }

    /// Version for a dependency key, `None` when the key is not a platform
    /// key or the platform lacks it.
    pub fn version_of(&self, key: &str) -> Option<&str> {
        if key == RUNTIME_KEY {
            self.runtime_version()
        } else {
            extension_name(key).and_then(|name| self.extension_version(name))
        }
    }

    /// Whether `key` names the runtime or an extension.
    pub fn is_platform_key(key: &str) -> bool {
        key == RUNTIME_KEY || key.starts_with(EXTENSION_PREFIX)
    }
}

fn extension_name(key: &str) -> Option<&str> {
    key.strip_prefix(EXTENSION_PREFIX)
        .or_else(|| key.strip_prefix("ext-"))
        .filter(|name| !name.is_empty())
}

impl From<IndexMap<String, String>> for Platform {
    fn from(entries: IndexMap<String, String>) -> Self {
        Platform::new().with_overrides(&entries)
    }
}

impl From<Platform> for IndexMap<String, String> {
    fn from(platform: Platform) -> Self {
        let mut entries = IndexMap::new();
        if let Some(version) = platform.runtime_version {
            entries.insert(RUNTIME_KEY.to_string(), version);
        }
        for (name, version) in platform.extensions {
            entries.insert(format!("{}{}", EXTENSION_PREFIX, name), version);
        }
        entries
    }
}
