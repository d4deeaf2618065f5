use thiserror::Error;
use trellis_semver::VersionError;

#[derive(Error, Debug)]
pub enum ModuleError {
    // Loading errors
    #[error("Module not found: {name}")]
    ModuleNotFound { name: String },

    // Dependency errors
    #[error("Required dependency unsatisfied: {module} requires {dependency} {constraint}")]
    UnsatisfiedRequiredDependency {
        module: String,
        dependency: String,
        constraint: String,
    },

    #[error("Malformed version in dependency {dependency} of {module}: {source}")]
    MalformedVersion {
        module: String,
        dependency: String,
        #[source]
        source: VersionError,
    },

    // Config errors
    #[error("Merged configuration is read-only")]
    ConfigLocked,

    #[error("Configuration error: {0}")]
    Config(String),

    // Event errors
    #[error("Listener for {event} failed: {message}")]
    Listener { event: String, message: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModuleError>;
