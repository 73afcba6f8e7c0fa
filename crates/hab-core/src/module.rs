//! Module instances
//!
//! A module is a trigger, condition or action placed inside a rule. It
//! references its type by uid, carries its own configuration and may wire
//! some of its inputs explicitly to other modules' outputs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Value;

/// Resolved configuration handed to module handlers
pub type Configuration = IndexMap<String, Value>;

/// The slot a module occupies in a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Detects events, produces outputs only
    Trigger,

    /// Tests the situation, consumes inputs only
    Condition,

    /// Does the work, consumes inputs and may produce outputs
    Action,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Trigger => "trigger",
            ModuleKind::Condition => "condition",
            ModuleKind::Action => "action",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module instance inside a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Identifier, unique within the rule
    pub id: String,

    /// Module type uid
    #[serde(rename = "type", alias = "type_uid")]
    pub type_uid: String,

    /// Slot in the rule (filled in from the list the module is declared in)
    #[serde(skip, default = "default_kind")]
    pub kind: ModuleKind,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Configuration, values may contain `${name}` references
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub configuration: IndexMap<String, serde_json::Value>,

    /// Explicit connections: input name to `"moduleId.outputName"`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub inputs: IndexMap<String, String>,
}

fn default_kind() -> ModuleKind {
    ModuleKind::Action
}

impl Module {
    /// Create a module without configuration or explicit connections
    pub fn new(id: impl Into<String>, type_uid: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            id: id.into(),
            type_uid: type_uid.into(),
            kind,
            label: None,
            configuration: IndexMap::new(),
            inputs: IndexMap::new(),
        }
    }

    pub fn trigger(id: impl Into<String>, type_uid: impl Into<String>) -> Self {
        Self::new(id, type_uid, ModuleKind::Trigger)
    }

    pub fn condition(id: impl Into<String>, type_uid: impl Into<String>) -> Self {
        Self::new(id, type_uid, ModuleKind::Condition)
    }

    pub fn action(id: impl Into<String>, type_uid: impl Into<String>) -> Self {
        Self::new(id, type_uid, ModuleKind::Action)
    }

    /// Wire an input explicitly to `"moduleId.outputName"`
    pub fn with_input(mut self, input: impl Into<String>, source: impl Into<String>) -> Self {
        self.inputs.insert(input.into(), source.into());
        self
    }

    /// Add a configuration entry
    pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.configuration.insert(key.into(), value);
        self
    }

    /// Check whether an input has an explicit connection
    pub fn is_explicitly_connected(&self, input: &str) -> bool {
        self.inputs.contains_key(input)
    }

    /// Configuration converted to dynamic values for reference resolution
    pub fn configuration_values(&self) -> Configuration {
        self.configuration
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_serialize(v)))
            .collect()
    }
}
