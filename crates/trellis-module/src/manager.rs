//! Loads application modules and merges their configuration.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::config::MergedConfig;
use crate::error::{ModuleError, Result};
use crate::event::{EventDispatcher, ModuleEvent, ModuleEventListener};
use crate::module::Module;
use crate::options::ModuleManagerOptions;
use crate::registry::ModuleRegistry;
use crate::resolver::{DependencyReport, DependencyResolver};

/// Creates each module once, runs its `init` hook and merges its
/// configuration into a single tree.
///
/// ```
/// use trellis_module::{Module, ModuleManager, ModuleManagerOptions, ModuleRegistry};
///
/// struct Blog;
/// impl Module for Blog {
///     fn config(&self, _env: &str) -> Option<serde_json::Value> {
///         Some(serde_json::json!({"blog": {"per_page": 10}}))
///     }
/// }
///
/// let mut registry = ModuleRegistry::new();
/// registry.register("Blog", || Blog);
///
/// let mut manager = ModuleManager::new(registry, ModuleManagerOptions::default());
/// manager.bootstrap(["Blog"]).unwrap();
///
/// assert_eq!(manager.merged_config().pointer("/blog/per_page"), Some(&serde_json::json!(10)));
/// ```
pub struct ModuleManager {
    registry: ModuleRegistry,
    options: ModuleManagerOptions,
    loaded: IndexMap<String, Arc<dyn Module>>,
    config: MergedConfig,
    skip_config: bool,
    events: EventDispatcher,
}

impl ModuleManager {
    pub fn new(registry: ModuleRegistry, options: ModuleManagerOptions) -> Self {
        Self {
            registry,
            options,
            loaded: IndexMap::new(),
            config: MergedConfig::new(),
            skip_config: false,
            events: EventDispatcher::new(),
        }
    }

    pub fn add_listener(&mut self, event: ModuleEvent, listener: Arc<dyn ModuleEventListener>) {
        self.events.add_listener(event, listener);
    }

    /// Restore the cached configuration if possible, load `names`, refresh
    /// the cache, lock the configuration and fire [`ModuleEvent::InitPost`].
    pub fn bootstrap<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.restore_cached_config()?;
        self.load_modules(names)?;
        self.update_cache()?;
        self.config.finalize();
        self.events.dispatch(ModuleEvent::InitPost, self)
    }

    /// Load modules in the given order.
    pub fn load_modules<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.load_module(name.as_ref())?;
        }
        Ok(())
    }

    /// Load a module, or return the instance loaded earlier under `name`.
    pub fn load_module(&mut self, name: &str) -> Result<Arc<dyn Module>> {
        if let Some(module) = self.loaded.get(name) {
            return Ok(Arc::clone(module));
        }

        if self.config.is_locked() && !self.skip_config {
            return Err(ModuleError::ConfigLocked);
        }

        let module = self
            .registry
            .create(name)
            .ok_or_else(|| ModuleError::ModuleNotFound {
                name: name.to_string(),
            })?;

        let fragment = if self.skip_config {
            None
        } else {
            module.config(&self.options.application_env)
        };
        if fragment.as_ref().is_some_and(|f| !f.is_object()) {
            return Err(ModuleError::Config(format!(
                "module {}: configuration fragment must be an object",
                name
            )));
        }

        log::debug!("Loading module {}", name);
        module.init(self)?;

        if let Some(fragment) = fragment {
            self.config.merge(fragment)?;
        }

        self.loaded.insert(name.to_string(), Arc::clone(&module));
        Ok(module)
    }

    /// Check every loaded module's dependencies.
    pub fn resolve_dependencies(&self) -> Result<DependencyReport> {
        DependencyResolver::new(&self.options.platform, &self.loaded).resolve()
    }

    pub fn loaded_modules(&self) -> &IndexMap<String, Arc<dyn Module>> {
        &self.loaded
    }

    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.loaded.get(name)
    }

    /// Names of the loaded modules in load order.
    pub fn module_names(&self) -> Vec<String> {
        self.loaded.keys().cloned().collect()
    }

    pub fn merged_config(&self) -> &MergedConfig {
        &self.config
    }

    pub fn options(&self) -> &ModuleManagerOptions {
        &self.options
    }

    /// Whether the configuration came from the cache rather than the modules.
    pub fn uses_cached_config(&self) -> bool {
        self.skip_config
    }

    fn restore_cached_config(&mut self) -> Result<bool> {
        let Some(cache) = self.options.config_cache() else {
            return Ok(false);
        };

        match cache.read()? {
            Some(cached) => {
                self.config = MergedConfig::from_value(cached)?;
                self.skip_config = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_cache(&self) -> Result<()> {
        if self.skip_config {
            return Ok(());
        }
        match self.options.config_cache() {
            Some(cache) => cache.write(self.config.as_value()),
            None => Ok(()),
        }
    }
}
