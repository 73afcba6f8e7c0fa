//! Rule management
//!
//! The RuleManager owns the rules of the running system together with their
//! resolved connection plans. Every add or update rebuilds the rule's
//! connections from scratch; removing a rule drops them.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hab_core::{Rule, RuleConfig, RuleError};
use hab_registries::ModuleTypeRegistry;
use thiserror::Error;
use tracing::{debug, info};

use crate::connector::{resolve_connections, ConnectionPlan, ConnectorError, ConnectorOptions};

/// Rule manager errors
#[derive(Debug, Error)]
pub enum RuleManagerError {
    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("Rule with uid {0} already exists")]
    AlreadyExists(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Connection error: {0}")]
    Connector(#[from] ConnectorError),
}

/// Result type for rule manager operations
pub type RuleManagerResult<T> = Result<T, RuleManagerError>;

/// A rule together with its current connection plan
#[derive(Debug, Clone)]
pub struct ManagedRule {
    pub rule: Rule,

    pub plan: ConnectionPlan,

    /// When the connections were last resolved
    pub built_at: DateTime<Utc>,
}

/// Manages all rules and their connections
pub struct RuleManager {
    /// Module type lookup
    registry: Arc<dyn ModuleTypeRegistry>,

    options: ConnectorOptions,

    /// All rules by uid
    rules: DashMap<String, ManagedRule>,
}

impl RuleManager {
    /// Create a new rule manager
    pub fn new(registry: Arc<dyn ModuleTypeRegistry>) -> Self {
        Self::with_options(registry, ConnectorOptions::default())
    }

    /// Create a rule manager with specific connector options
    pub fn with_options(registry: Arc<dyn ModuleTypeRegistry>, options: ConnectorOptions) -> Self {
        Self {
            registry,
            options,
            rules: DashMap::new(),
        }
    }

    pub fn options(&self) -> ConnectorOptions {
        self.options
    }

    fn build(&self, rule: Rule) -> RuleManagerResult<ManagedRule> {
        rule.validate()?;
        let plan = resolve_connections(&rule, self.registry.as_ref(), self.options)?;
        debug!(
            "Built rule {}: {} connections, {} diagnostics",
            rule.display_name(),
            plan.connections().len(),
            plan.diagnostics().len()
        );
        Ok(ManagedRule {
            rule,
            plan,
            built_at: Utc::now(),
        })
    }

    /// Load rules from configs
    ///
    /// Every rule is validated and resolved before any is installed, so a
    /// failing config leaves the manager unchanged.
    pub fn load(&self, configs: Vec<RuleConfig>) -> RuleManagerResult<()> {
        let mut seen = HashSet::new();
        let mut built = Vec::with_capacity(configs.len());

        for config in configs {
            let rule = Rule::from_config(config);
            if self.rules.contains_key(&rule.uid) || !seen.insert(rule.uid.clone()) {
                return Err(RuleManagerError::AlreadyExists(rule.uid));
            }
            built.push(self.build(rule)?);
        }

        for managed in built {
            info!(
                "Added rule: {} ({})",
                managed.rule.display_name(),
                managed.rule.uid
            );
            self.rules.insert(managed.rule.uid.clone(), managed);
        }
        Ok(())
    }

    /// Add a new rule and resolve its connections
    pub fn add(&self, rule: Rule) -> RuleManagerResult<ConnectionPlan> {
        match self.rules.entry(rule.uid.clone()) {
            Entry::Occupied(entry) => Err(RuleManagerError::AlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                let managed = self.build(rule)?;
                let plan = managed.plan.clone();
                info!(
                    "Added rule: {} ({})",
                    managed.rule.display_name(),
                    managed.rule.uid
                );
                entry.insert(managed);
                Ok(plan)
            }
        }
    }

    /// Replace an existing rule and re-resolve its connections
    pub fn update(&self, rule: Rule) -> RuleManagerResult<ConnectionPlan> {
        let mut managed = self
            .rules
            .get_mut(&rule.uid)
            .ok_or_else(|| RuleManagerError::NotFound(rule.uid.clone()))?;

        *managed = self.build(rule)?;
        info!(
            "Updated rule: {} ({})",
            managed.rule.display_name(),
            managed.rule.uid
        );
        Ok(managed.plan.clone())
    }

    /// Re-resolve a rule's connections, e.g. after module types changed
    pub fn rebuild(&self, uid: &str) -> RuleManagerResult<ConnectionPlan> {
        let mut managed = self
            .rules
            .get_mut(uid)
            .ok_or_else(|| RuleManagerError::NotFound(uid.to_string()))?;

        let rule = managed.rule.clone();
        *managed = self.build(rule)?;
        Ok(managed.plan.clone())
    }

    /// Rebuild every rule that uses a module type, returning how many were rebuilt
    pub fn rebuild_using_type(&self, type_uid: &str) -> RuleManagerResult<usize> {
        let uids: Vec<String> = self
            .rules
            .iter()
            .filter(|r| r.value().rule.modules().any(|m| m.type_uid == type_uid))
            .map(|r| r.key().clone())
            .collect();

        for uid in &uids {
            self.rebuild(uid)?;
        }
        if !uids.is_empty() {
            info!("Rebuilt {} rules using module type {}", uids.len(), type_uid);
        }
        Ok(uids.len())
    }

    /// Remove a rule
    pub fn remove(&self, uid: &str) -> RuleManagerResult<Rule> {
        let (_, managed) = self
            .rules
            .remove(uid)
            .ok_or_else(|| RuleManagerError::NotFound(uid.to_string()))?;
        info!("Removed rule: {}", managed.rule.display_name());
        Ok(managed.rule)
    }

    /// Get a rule by uid
    pub fn get(&self, uid: &str) -> Option<Rule> {
        self.rules.get(uid).map(|r| r.value().rule.clone())
    }

    /// Get a rule's current connection plan
    pub fn plan(&self, uid: &str) -> Option<ConnectionPlan> {
        self.rules.get(uid).map(|r| r.value().plan.clone())
    }

    /// Get a rule with its plan and build time
    pub fn managed(&self, uid: &str) -> Option<ManagedRule> {
        self.rules.get(uid).map(|r| r.value().clone())
    }

    /// All rule uids
    pub fn uids(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.key().clone()).collect()
    }

    /// Get rule count
    pub fn count(&self) -> usize {
        self.rules.len()
    }
}
