//! Module manager options and where they come from.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::ConfigCache;
use crate::error::{ModuleError, Result};
use crate::platform::Platform;

const ENV_PREFIX: &str = "TRELLIS_";

/// Settings for a [`ModuleManager`](crate::ModuleManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ModuleManagerOptions {
    /// Passed to every module's `config` hook.
    pub application_env: String,
    /// Reuse the merged configuration from `cache_file_path`.
    pub cache_config: bool,
    pub cache_file_path: PathBuf,
    /// Validity token stored with the cache; a different token makes it stale.
    pub cache_token: Option<String>,
    pub platform: Platform,
}

impl Default for ModuleManagerOptions {
    fn default() -> Self {
        Self {
            application_env: "production".to_string(),
            cache_config: false,
            cache_file_path: PathBuf::from("data/cache/module-config.json"),
            cache_token: None,
            platform: Platform::default(),
        }
    }
}

impl ModuleManagerOptions {
    /// Load options from a JSON file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ModuleError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ModuleError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn with_application_env(mut self, env: impl Into<String>) -> Self {
        self.application_env = env.into();
        self
    }

    pub fn with_cache(mut self, path: impl Into<PathBuf>, token: Option<String>) -> Self {
        self.cache_config = true;
        self.cache_file_path = path.into();
        self.cache_token = token;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// The config cache, when caching is enabled.
    pub fn config_cache(&self) -> Option<ConfigCache> {
        self.cache_config
            .then(|| ConfigCache::new(&self.cache_file_path, self.cache_token.clone()))
    }
}

/// Builds [`ModuleManagerOptions`] from a file and `TRELLIS_*` environment
/// variables, the environment taking precedence.
#[derive(Debug)]
pub struct OptionsLoader {
    use_environment: bool,
}

impl OptionsLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    pub fn load(&self, path: Option<&Path>) -> Result<ModuleManagerOptions> {
        let mut options = match path {
            Some(path) => ModuleManagerOptions::load(path)?,
            None => ModuleManagerOptions::default(),
        };
        self.apply_environment(&mut options);
        Ok(options)
    }

    pub fn apply_environment(&self, options: &mut ModuleManagerOptions) {
        if let Some(env) = self.get_env_config("application-env") {
            options.application_env = env;
        }
        if let Some(cache) = self.get_env_bool("cache-config") {
            options.cache_config = cache;
        }
        if let Some(path) = self.get_env_path("cache-file") {
            options.cache_file_path = path;
        }
        if let Some(token) = self.get_env_config("cache-token") {
            options.cache_token = Some(token);
        }
    }

    /// Converts "cache-file" to `TRELLIS_CACHE_FILE`.
    pub fn get_env_config(&self, key: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        let var = format!("{}{}", ENV_PREFIX, key.replace('-', "_").to_uppercase());
        env::var(var).ok().filter(|s| !s.is_empty())
    }

    pub fn get_env_bool(&self, key: &str) -> Option<bool> {
        self.get_env_config(key)
            .map(|val| !matches!(val.to_lowercase().as_str(), "false" | "0" | "off" | "no"))
    }

    pub fn get_env_path(&self, key: &str) -> Option<PathBuf> {
        self.get_env_config(key).map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = ModuleManagerOptions::default();
        assert_eq!(options.application_env, "production");
        assert!(!options.cache_config);
        assert!(options.config_cache().is_none());
        assert_eq!(options.platform.runtime_version(), None);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let options = ModuleManagerOptions::load(dir.path().join("missing.json")).unwrap();
        assert_eq!(options, ModuleManagerOptions::default());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(
            &path,
            r#"{
                "application-env": "development",
                "cache-config": true,
                "cache-file-path": "/tmp/trellis.json",
                "cache-token": "abc",
                "platform": {"php": "5.3.3", "ext/json": "1.2"}
            }"#,
        )
        .unwrap();

        let options = ModuleManagerOptions::load(&path).unwrap();
        assert_eq!(options.application_env, "development");
        assert!(options.cache_config);
        assert_eq!(options.cache_token.as_deref(), Some("abc"));
        assert_eq!(options.platform.version_of("ext/json"), Some("1.2"));

        let cache = options.config_cache().unwrap();
        assert_eq!(cache.path(), Path::new("/tmp/trellis.json"));
        assert_eq!(cache.token(), Some("abc"));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(&path, r#"{"cache-config": "maybe"}"#).unwrap();

        assert!(matches!(ModuleManagerOptions::load(&path), Err(ModuleError::Config(_))));
    }

    #[test]
    fn test_loader_without_environment() {
        let loader = OptionsLoader::new(false);
        assert_eq!(loader.get_env_config("application-env"), None);
        assert_eq!(loader.load(None).unwrap(), ModuleManagerOptions::default());
    }
}
