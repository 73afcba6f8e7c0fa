//! Module type definitions
//!
//! A module type declares the inputs a module reads and the outputs it
//! produces. Types are owned by the module type registry and shared
//! read-only between rules.

use serde::{Deserialize, Serialize};

use crate::module::ModuleKind;
use crate::tags::TagSet;

/// A declared input of a module type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDef {
    /// Input name, unique within the type
    pub name: String,

    /// Tags an output must carry to be connected to this input
    #[serde(default)]
    pub tags: TagSet,

    /// Whether the module needs this input to run
    #[serde(default)]
    pub required: bool,

    /// Data type name (informational, never used for matching)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl InputDef {
    /// Create an optional input with the given tags
    pub fn new(name: impl Into<String>, tags: impl Into<TagSet>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
            required: false,
            type_name: None,
            label: None,
        }
    }

    /// Mark the input as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the data type name
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// A declared output of a module type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDef {
    /// Output name, unique within the type
    pub name: String,

    /// Tags describing the produced value
    #[serde(default)]
    pub tags: TagSet,

    /// Data type name (informational, never used for matching)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl OutputDef {
    pub fn new(name: impl Into<String>, tags: impl Into<TagSet>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
            type_name: None,
            label: None,
        }
    }

    /// Set the data type name
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// The declared shape of a module
///
/// Triggers only declare outputs, conditions only declare inputs and
/// actions may declare both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleType {
    /// Unique type identifier (e.g. "core.ItemStateChangeTrigger")
    pub uid: String,

    /// Which slot of a rule this type belongs to
    pub kind: ModuleKind,

    /// Declared inputs, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputDef>,

    /// Declared outputs, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputDef>,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModuleType {
    /// Create a trigger type with the given outputs
    pub fn trigger(uid: impl Into<String>, outputs: Vec<OutputDef>) -> Self {
        Self::new(uid, ModuleKind::Trigger, Vec::new(), outputs)
    }

    /// Create a condition type with the given inputs
    pub fn condition(uid: impl Into<String>, inputs: Vec<InputDef>) -> Self {
        Self::new(uid, ModuleKind::Condition, inputs, Vec::new())
    }

    /// Create an action type with the given inputs and outputs
    pub fn action(uid: impl Into<String>, inputs: Vec<InputDef>, outputs: Vec<OutputDef>) -> Self {
        Self::new(uid, ModuleKind::Action, inputs, outputs)
    }

    fn new(
        uid: impl Into<String>,
        kind: ModuleKind,
        inputs: Vec<InputDef>,
        outputs: Vec<OutputDef>,
    ) -> Self {
        Self {
            uid: uid.into(),
            kind,
            inputs,
            outputs,
            label: None,
            description: None,
        }
    }

    /// Set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Look up an input by name
    pub fn input(&self, name: &str) -> Option<&InputDef> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Look up an output by name
    pub fn output(&self, name: &str) -> Option<&OutputDef> {
        self.outputs.iter().find(|o| o.name == name)
    }
}
