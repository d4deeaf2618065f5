//! On-disk cache of the merged configuration.
//!
//! The file holds the tree together with the token it was written under:
//!
//! ```json
//! {"token": "build-42", "config": {...}}
//! ```
//!
//! A cache whose token differs from the current one is stale.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ModuleError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    token: Option<String>,
    config: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCache {
    path: PathBuf,
    token: Option<String>,
}

impl ConfigCache {
    pub fn new(path: impl Into<PathBuf>, token: Option<String>) -> Self {
        Self {
            path: path.into(),
            token,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the cached tree. `None` when there is no cache file or it was
    /// written under another token.
    pub fn read(&self) -> Result<Option<Value>> {
        if !self.exists() {
            log::debug!("No config cache at {}", self.path.display());
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let cached: CacheFile = serde_json::from_str(&contents).map_err(|e| {
            ModuleError::Config(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        if cached.token != self.token {
            log::warn!(
                "Ignoring stale config cache {} (token {:?}, expected {:?})",
                self.path.display(),
                cached.token,
                self.token
            );
            return Ok(None);
        }

        log::debug!("Restored merged config from {}", self.path.display());
        Ok(Some(cached.config))
    }

    /// Write `config` under the current token, creating parent directories.
    pub fn write(&self, config: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = CacheFile {
            token: self.token.clone(),
            config: config.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;

        log::debug!("Wrote config cache {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let cache = ConfigCache::new(dir.path().join("config.json"), None);
        assert!(!cache.exists());
        assert_eq!(cache.read().unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let cache = ConfigCache::new(dir.path().join("cache/config.json"), Some("v1".to_string()));

        cache.write(&json!({"db": {"host": "localhost"}})).unwrap();
        assert!(cache.exists());
        assert_eq!(cache.read().unwrap(), Some(json!({"db": {"host": "localhost"}})));

        let stored: Value =
            serde_json::from_str(&fs::read_to_string(cache.path()).unwrap()).unwrap();
        assert_eq!(stored["token"], json!("v1"));
    }

    #[test]
    fn test_token_mismatch_is_stale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        ConfigCache::new(&path, Some("v1".to_string()))
            .write(&json!({"a": 1}))
            .unwrap();

        assert_eq!(ConfigCache::new(&path, Some("v2".to_string())).read().unwrap(), None);
        assert_eq!(ConfigCache::new(&path, None).read().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = ConfigCache::new(&path, None).read().unwrap_err();
        assert!(matches!(err, ModuleError::Config(_)));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let cache = ConfigCache::new(dir.path().join("config.json"), None);
        cache.write(&json!({})).unwrap();
        cache.clear().unwrap();
        assert!(!cache.exists());
        cache.clear().unwrap();
    }
}
