//! Name to constructor table used by the manager to create modules.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::module::Module;

type Factory = Box<dyn Fn() -> Arc<dyn Module> + Send + Sync>;

#[derive(Default)]
pub struct ModuleRegistry {
    factories: IndexMap<String, Factory>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`, replacing any previous one.
    pub fn register<F, M>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Module + 'static,
    {
        self.factories
            .insert(name.into(), Box::new(move || Arc::new(factory()) as Arc<dyn Module>));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Create a fresh instance, or `None` for an unknown name.
    pub fn create(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.factories.get(name).map(|factory| factory())
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
