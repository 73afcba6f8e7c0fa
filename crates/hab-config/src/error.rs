//! Error types for definition loading

use hab_automation::RuleManagerError;
use hab_registries::RegistryError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading definitions
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML
    #[error("failed to parse YAML in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid include path
    #[error("invalid include path '{path}': {reason}")]
    InvalidIncludePath { path: String, reason: String },

    /// Directory not found for include_dir_*
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Circular include detected
    #[error("circular include detected: {path}")]
    CircularInclude { path: PathBuf },

    /// Environment variable not found and no default given
    #[error("environment variable '{var}' not set")]
    EnvVarNotFound { var: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// Definitions do not have the expected shape
    #[error("invalid definitions in {path}: {source}")]
    InvalidDefinitions {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A declared module type could not be registered
    #[error("invalid module type: {0}")]
    ModuleType(#[from] RegistryError),

    /// A declared rule could not be loaded
    #[error("invalid rule: {0}")]
    Rule(#[from] RuleManagerError),
}
