//! `/<module>/<controller>/<action>/<key>/<value>...` routes over the
//! registered modules of an application.

use serde::Deserialize;

use crate::convention::{Convention, PrefixRule};
use crate::error::{Result, RouterError};
use crate::params::Params;
use crate::route::{AssembleOptions, Route};
use crate::route_match::RouteMatch;

const MODULE_KEY: &str = "module";

/// Names of the modules an application has loaded.
pub type ModuleList = [String];

/// Options accepted by [`ModuleRoute::new`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleRouteOptions {
    pub defaults: Params,
}

/// Convention route whose first segment names a registered module.
/// Module names compare case-insensitively.
#[derive(Debug, Clone)]
pub struct ModuleRoute {
    engine: Convention,
}

impl ModuleRoute {
    pub fn new(options: ModuleRouteOptions, modules: &ModuleList) -> Self {
        log::debug!("Module route over {} modules", modules.len());
        Self {
            engine: Convention::new(
                MODULE_KEY,
                PrefixRule::OneOf(modules.to_vec()),
                options.defaults,
            ),
        }
    }

    pub fn from_options(options: &serde_json::Value, modules: &ModuleList) -> Result<Self> {
        if !options.is_object() {
            return Err(RouterError::invalid_configuration("Options must be an object"));
        }
        if !options.get("defaults").is_some_and(|d| d.is_object()) {
            return Err(RouterError::invalid_configuration("Defaults not defined nor an object"));
        }

        let options = ModuleRouteOptions::deserialize(options)
            .map_err(|e| RouterError::invalid_configuration(e.to_string()))?;
        Ok(Self::new(options, modules))
    }

    pub fn modules(&self) -> &[String] {
        match self.engine.rule() {
            PrefixRule::OneOf(modules) => modules,
            PrefixRule::Literal(_) => &[],
        }
    }
}

impl Route for ModuleRoute {
    fn match_path(&self, path: &str, path_offset: Option<usize>) -> Option<RouteMatch> {
        self.engine.match_path(path, path_offset)
    }

    fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        last_match: Option<&RouteMatch>,
    ) -> Result<String> {
        self.engine.assemble(params, options, last_match)
    }

    fn defaults(&self) -> &Params {
        self.engine.defaults()
    }
}
