//! Module manager lifecycle events.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ModuleError, Result};
use crate::manager::ModuleManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleEvent {
    /// All modules are loaded and the merged configuration is final.
    InitPost,
}

impl ModuleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ModuleEvent::InitPost => "init.post",
        }
    }
}

/// Receives module manager events.
pub trait ModuleEventListener: Send + Sync {
    fn handle(&self, event: ModuleEvent, manager: &ModuleManager) -> anyhow::Result<()>;

    /// Higher runs earlier.
    fn priority(&self) -> i32 {
        0
    }
}

impl<F> ModuleEventListener for F
where
    F: Fn(ModuleEvent, &ModuleManager) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, event: ModuleEvent, manager: &ModuleManager) -> anyhow::Result<()> {
        self(event, manager)
    }
}

#[derive(Default)]
pub struct EventDispatcher {
    listeners: HashMap<ModuleEvent, Vec<Arc<dyn ModuleEventListener>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, event: ModuleEvent, listener: Arc<dyn ModuleEventListener>) {
        self.listeners.entry(event).or_default().push(listener);
    }

    pub fn listener_count(&self, event: ModuleEvent) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }

    /// Run the listeners for `event`, stopping at the first failure.
    pub fn dispatch(&self, event: ModuleEvent, manager: &ModuleManager) -> Result<()> {
        let Some(listeners) = self.listeners.get(&event) else {
            return Ok(());
        };

        let mut sorted: Vec<_> = listeners.iter().collect();
        sorted.sort_by(|a, b| b.priority().cmp(&a.priority()));

        log::debug!("Dispatching {} to {} listeners", event.name(), sorted.len());
        for listener in sorted {
            listener
                .handle(event, manager)
                .map_err(|e| ModuleError::Listener {
                    event: event.name().to_string(),
                    message: format!("{:#}", e),
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(ModuleEvent::InitPost.name(), "init.post");
    }

    #[test]
    fn test_add_listener() {
        let mut dispatcher = EventDispatcher::new();
        assert_eq!(dispatcher.listener_count(ModuleEvent::InitPost), 0);

        dispatcher.add_listener(
            ModuleEvent::InitPost,
            Arc::new(|_: ModuleEvent, _: &ModuleManager| Ok::<(), anyhow::Error>(())),
        );
        assert_eq!(dispatcher.listener_count(ModuleEvent::InitPost), 1);
    }
}
