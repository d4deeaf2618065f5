//! Module loading for Trellis applications
//!
//! A [`ModuleManager`] creates the modules an application lists, runs their
//! `init` hooks, merges their configuration fragments into one tree
//! (optionally cached on disk) and checks the dependencies they declare
//! against the [`Platform`] and against each other.

mod cache;
mod config;
mod error;
mod event;
mod manager;
mod module;
mod options;
mod platform;
mod registry;
mod resolver;

pub use cache::ConfigCache;
pub use config::MergedConfig;
pub use error::{ModuleError, Result};
pub use event::{EventDispatcher, ModuleEvent, ModuleEventListener};
pub use manager::ModuleManager;
pub use module::{Dependency, Module, Provides};
pub use options::{ModuleManagerOptions, OptionsLoader};
pub use platform::Platform;
pub use registry::ModuleRegistry;
pub use resolver::{DependencyReport, DependencyResolver};
