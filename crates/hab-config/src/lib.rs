//! YAML definitions for the rule-wiring engine
//!
//! This crate loads module types, rules and engine settings from YAML,
//! with a few custom tags:
//!
//! - `!include path` - Include another YAML file
//! - `!include_dir_merge_list dir` - Merge lists from all YAML files in a directory
//! - `!env_var VAR [default]` - Environment variable substitution
//!
//! # Example
//!
//! ```ignore
//! use hab_config::load_definitions;
//!
//! let definitions = load_definitions("/config", "rules.yaml")?;
//! let manager = definitions.into_manager()?;
//! ```

mod definitions;
mod error;
mod loader;
mod settings;

pub use definitions::{load_definitions, Definitions};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, load_yaml_string, YamlLoader};
pub use settings::EngineSettings;

// Re-export serde_yaml::Value for convenience
pub use serde_yaml::Value;
