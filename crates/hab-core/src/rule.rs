//! Rule definitions
//!
//! A rule ties together triggers, conditions and actions. Its modules are
//! rebuilt (and thus reconnected) every time the rule is added or updated.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::module::{Module, ModuleKind};
use crate::tags::TagSet;

/// Rule errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Duplicate module id '{module_id}' in rule {rule_uid}")]
    DuplicateModuleId { rule_uid: String, module_id: String },

    #[error("Module id cannot be empty in rule {0}")]
    EmptyModuleId(String),
}

/// Result type for rule operations
pub type RuleResult<T> = Result<T, RuleError>;

/// Rule configuration as authored (YAML/JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Unique ID (optional, auto-generated if not provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Human-readable name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tags for organizing rules
    #[serde(default)]
    pub tags: TagSet,

    /// Rule-level configuration
    #[serde(default)]
    pub configuration: IndexMap<String, serde_json::Value>,

    #[serde(default, alias = "trigger")]
    pub triggers: Vec<Module>,

    #[serde(default, alias = "condition")]
    pub conditions: Vec<Module>,

    #[serde(default, alias = "action")]
    pub actions: Vec<Module>,
}

/// A rule with its modules
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Unique identifier
    pub uid: String,

    pub name: Option<String>,

    pub description: Option<String>,

    pub tags: TagSet,

    pub configuration: IndexMap<String, serde_json::Value>,

    pub triggers: Vec<Module>,

    pub conditions: Vec<Module>,

    pub actions: Vec<Module>,
}

impl Rule {
    /// Create an empty rule
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: None,
            description: None,
            tags: TagSet::new(),
            configuration: IndexMap::new(),
            triggers: Vec::new(),
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Create from config
    ///
    /// Module kinds are taken from the list each module is declared in.
    pub fn from_config(config: RuleConfig) -> Self {
        let uid = config.uid.unwrap_or_else(|| ulid::Ulid::new().to_string());

        Self {
            uid,
            name: config.name,
            description: config.description,
            tags: config.tags,
            configuration: config.configuration,
            triggers: with_kind(config.triggers, ModuleKind::Trigger),
            conditions: with_kind(config.conditions, ModuleKind::Condition),
            actions: with_kind(config.actions, ModuleKind::Action),
        }
    }

    /// Add a module to the list matching its kind
    pub fn with_module(mut self, module: Module) -> Self {
        match module.kind {
            ModuleKind::Trigger => self.triggers.push(module),
            ModuleKind::Condition => self.conditions.push(module),
            ModuleKind::Action => self.actions.push(module),
        }
        self
    }

    /// Get display name (name or uid)
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.uid)
    }

    /// All modules: triggers, then conditions, then actions
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.triggers
            .iter()
            .chain(self.conditions.iter())
            .chain(self.actions.iter())
    }

    /// Look up a module by id
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules().find(|m| m.id == id)
    }

    /// Check that module ids are non-empty and unique within the rule
    pub fn validate(&self) -> RuleResult<()> {
        let mut seen = HashSet::new();
        for module in self.modules() {
            if module.id.is_empty() {
                return Err(RuleError::EmptyModuleId(self.uid.clone()));
            }
            if !seen.insert(module.id.as_str()) {
                return Err(RuleError::DuplicateModuleId {
                    rule_uid: self.uid.clone(),
                    module_id: module.id.clone(),
                });
            }
        }
        Ok(())
    }
}

fn with_kind(modules: Vec<Module>, kind: ModuleKind) -> Vec<Module> {
    modules
        .into_iter()
        .map(|mut m| {
            m.kind = kind;
            m
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> RuleConfig {
        serde_json::from_str(
            r#"{
                "uid": "rule1",
                "name": "Motion light",
                "tags": ["lighting"],
                "triggers": [
                    {"id": "t1", "type": "core.ItemStateChangeTrigger", "configuration": {"itemName": "Motion"}}
                ],
                "conditions": [
                    {"id": "c1", "type": "core.ItemStateCondition", "inputs": {"event": "t1.event"}}
                ],
                "actions": [
                    {"id": "a1", "type": "core.ItemCommandAction"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_rule_from_config() {
        let rule = Rule::from_config(sample_config());

        assert_eq!(rule.uid, "rule1");
        assert_eq!(rule.display_name(), "Motion light");
        assert!(rule.tags.contains("lighting"));
        assert_eq!(rule.triggers[0].kind, ModuleKind::Trigger);
        assert_eq!(rule.conditions[0].kind, ModuleKind::Condition);
        assert_eq!(rule.actions[0].kind, ModuleKind::Action);
        assert_eq!(
            rule.modules().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["t1", "c1", "a1"]
        );
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_auto_generated_uid() {
        let config: RuleConfig = serde_json::from_str(r#"{"name": "No uid"}"#).unwrap();
        let rule = Rule::from_config(config);

        // ULID format
        assert_eq!(rule.uid.len(), 26);
        assert_eq!(rule.display_name(), "No uid");
    }

    #[test]
    fn test_duplicate_module_ids_rejected() {
        let rule = Rule::new("r")
            .with_module(Module::trigger("m1", "x"))
            .with_module(Module::action("m1", "y"));

        assert_eq!(
            rule.validate(),
            Err(RuleError::DuplicateModuleId {
                rule_uid: "r".to_string(),
                module_id: "m1".to_string(),
            })
        );
    }

    #[test]
    fn test_module_lookup() {
        let rule = Rule::from_config(sample_config());
        assert_eq!(
            rule.module("c1").map(|m| m.type_uid.as_str()),
            Some("core.ItemStateCondition")
        );
        assert!(rule.module("zz").is_none());
    }
}
