//! Checks every loaded module's declared dependencies against the platform
//! and against what the other loaded modules provide.

use indexmap::IndexMap;
use std::sync::Arc;
use trellis_semver::VersionConstraint;

use crate::error::{ModuleError, Result};
use crate::module::{Dependency, Module};
use crate::platform::Platform;

/// Unsatisfied optional dependencies, keyed by module then dependency.
///
/// Every module that was checked has an entry, empty when all of its
/// dependencies are met.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    entries: IndexMap<String, IndexMap<String, Dependency>>,
}

impl DependencyReport {
    /// Unsatisfied dependencies of `module`, `None` if it was not checked.
    pub fn unsatisfied(&self, module: &str) -> Option<&IndexMap<String, Dependency>> {
        self.entries.get(module)
    }

    /// True when no module has an unsatisfied dependency.
    pub fn is_satisfied(&self) -> bool {
        self.entries.values().all(IndexMap::is_empty)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<String, Dependency>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct DependencyResolver<'a> {
    platform: &'a Platform,
    modules: &'a IndexMap<String, Arc<dyn Module>>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(platform: &'a Platform, modules: &'a IndexMap<String, Arc<dyn Module>>) -> Self {
        Self { platform, modules }
    }

    /// Check all modules in load order.
    ///
    /// Fails on the first unmet required dependency or malformed version;
    /// unmet optional dependencies are collected into the report.
    pub fn resolve(&self) -> Result<DependencyReport> {
        let mut report = DependencyReport::default();

        for (module_name, module) in self.modules {
            let mut unsatisfied = IndexMap::new();

            for (dependency, info) in module.dependencies() {
                let malformed = |source| ModuleError::MalformedVersion {
                    module: module_name.clone(),
                    dependency: dependency.clone(),
                    source,
                };

                let constraint = VersionConstraint::parse(&info.version).map_err(malformed)?;
                if self.is_satisfied(&dependency, &constraint).map_err(malformed)? {
                    continue;
                }

                if info.required {
                    return Err(ModuleError::UnsatisfiedRequiredDependency {
                        module: module_name.clone(),
                        dependency,
                        constraint: info.version,
                    });
                }

                log::warn!(
                    "Optional dependency unsatisfied: {} requires {} {}",
                    module_name,
                    dependency,
                    info.version
                );
                unsatisfied.insert(dependency, info);
            }

            report.entries.insert(module_name.clone(), unsatisfied);
        }

        Ok(report)
    }

    fn is_satisfied(
        &self,
        dependency: &str,
        constraint: &VersionConstraint,
    ) -> std::result::Result<bool, trellis_semver::VersionError> {
        if Platform::is_platform_key(dependency) {
            return match self.platform.version_of(dependency) {
                Some(version) => constraint.satisfied_by(version),
                None => {
                    log::debug!("Platform does not provide {}", dependency);
                    Ok(false)
                }
            };
        }

        for provides in self.modules.values().filter_map(|m| m.provides()) {
            if provides.name == dependency && constraint.satisfied_by(&provides.version)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Provides;

    struct Declares {
        dependencies: Vec<(&'static str, Dependency)>,
        provides: Option<Provides>,
    }

    impl Module for Declares {
        fn dependencies(&self) -> IndexMap<String, Dependency> {
            self.dependencies
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect()
        }

        fn provides(&self) -> Option<Provides> {
            self.provides.clone()
        }
    }

    fn module(
        dependencies: Vec<(&'static str, Dependency)>,
        provides: Option<Provides>,
    ) -> Arc<dyn Module> {
        Arc::new(Declares {
            dependencies,
            provides,
        })
    }

    fn platform() -> Platform {
        Platform::new()
            .with_runtime_version("5.3.3")
            .with_extension("json", "1.2.1")
    }

    #[test]
    fn test_report_covers_every_module() {
        let mut modules = IndexMap::new();
        modules.insert("Blog".to_string(), module(vec![], Some(Provides::new("blog", "1.0"))));
        modules.insert(
            "Shop".to_string(),
            module(vec![("php", Dependency::required(">=5.3"))], None),
        );

        let platform = platform();
        let report = DependencyResolver::new(&platform, &modules).resolve().unwrap();

        assert_eq!(report.modules().collect::<Vec<_>>(), vec!["Blog", "Shop"]);
        assert!(report.is_satisfied());
        assert!(report.unsatisfied("Shop").unwrap().is_empty());
        assert!(report.unsatisfied("Forum").is_none());
    }

    #[test]
    fn test_runtime_dependency() {
        let platform = platform();
        let mut modules = IndexMap::new();
        modules.insert(
            "Shop".to_string(),
            module(vec![("php", Dependency::required(">=5.4"))], None),
        );

        let err = DependencyResolver::new(&platform, &modules).resolve().unwrap_err();
        match err {
            ModuleError::UnsatisfiedRequiredDependency {
                module,
                dependency,
                constraint,
            } => {
                assert_eq!(module, "Shop");
                assert_eq!(dependency, "php");
                assert_eq!(constraint, ">=5.4");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_runtime_is_unsatisfied() {
        let platform = Platform::new();
        let mut modules = IndexMap::new();
        modules.insert(
            "Shop".to_string(),
            module(vec![("php", Dependency::optional(">=5.3"))], None),
        );

        let report = DependencyResolver::new(&platform, &modules).resolve().unwrap();
        assert!(!report.is_satisfied());
        assert!(report.unsatisfied("Shop").unwrap().contains_key("php"));
    }

    #[test]
    fn test_extension_dependencies() {
        let platform = platform();
        let mut modules = IndexMap::new();
        modules.insert(
            "Shop".to_string(),
            module(
                vec![
                    ("ext/json", Dependency::required("ge1.2")),
                    ("ext/intl", Dependency::optional("1.0")),
                ],
                None,
            ),
        );

        let report = DependencyResolver::new(&platform, &modules).resolve().unwrap();
        let unsatisfied = report.unsatisfied("Shop").unwrap();
        assert_eq!(unsatisfied.keys().collect::<Vec<_>>(), vec!["ext/intl"]);

        modules.insert(
            "Mail".to_string(),
            module(vec![("ext/imap", Dependency::required("1.0"))], None),
        );
        let err = DependencyResolver::new(&platform, &modules).resolve().unwrap_err();
        assert!(matches!(
            err,
            ModuleError::UnsatisfiedRequiredDependency { ref dependency, .. } if dependency == "ext/imap"
        ));
    }

    #[test]
    fn test_provided_dependencies() {
        let platform = platform();
        let mut modules = IndexMap::new();
        modules.insert("Blog".to_string(), module(vec![], Some(Provides::new("blog", "1.2"))));
        modules.insert(
            "Comments".to_string(),
            module(
                vec![
                    ("blog", Dependency::required(">=1.0")),
                    ("forum", Dependency::optional("1.0")),
                    ("blog-api", Dependency::optional("1.0")),
                ],
                None,
            ),
        );

        let report = DependencyResolver::new(&platform, &modules).resolve().unwrap();
        let unsatisfied = report.unsatisfied("Comments").unwrap();
        assert_eq!(unsatisfied.keys().collect::<Vec<_>>(), vec!["forum", "blog-api"]);

        modules.insert(
            "Gallery".to_string(),
            module(vec![("blog", Dependency::required(">=2.0"))], None),
        );
        assert!(DependencyResolver::new(&platform, &modules).resolve().is_err());
    }

    #[test]
    fn test_malformed_constraint_is_fatal() {
        let platform = platform();
        let mut modules = IndexMap::new();
        modules.insert(
            "Shop".to_string(),
            module(vec![("php", Dependency::optional("~1.0"))], None),
        );

        let err = DependencyResolver::new(&platform, &modules).resolve().unwrap_err();
        assert!(matches!(
            err,
            ModuleError::MalformedVersion { ref module, ref dependency, .. }
                if module == "Shop" && dependency == "php"
        ));
    }

    #[test]
    fn test_malformed_platform_version_is_fatal() {
        let platform = Platform::new().with_runtime_version("unknown");
        let mut modules = IndexMap::new();
        modules.insert(
            "Shop".to_string(),
            module(vec![("php", Dependency::optional(">=5.3"))], None),
        );

        assert!(matches!(
            DependencyResolver::new(&platform, &modules).resolve(),
            Err(ModuleError::MalformedVersion { .. })
        ));
    }
}
