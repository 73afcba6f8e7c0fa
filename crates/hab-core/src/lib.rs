//! Core types for the rule-wiring engine
//!
//! This crate provides the data model shared by the connector and the
//! reference resolver: tag sets, module types, module instances, rules,
//! connections and the execution context modules read their inputs from.
//!
//! # Key Types
//!
//! - [`TagSet`] - Semantic labels used for input/output compatibility
//! - [`ModuleType`] - Declared inputs and outputs of a module type
//! - [`Module`] - A trigger, condition or action instance inside a rule
//! - [`Rule`] - Ordered triggers, conditions and actions
//! - [`Connection`] - An input wired to a source output
//! - [`ExecutionContext`] - Values produced while a rule runs

mod connection;
mod context;
mod module;
mod module_type;
mod property;
mod rule;
mod tags;

pub use connection::{Connection, ConnectionOrigin, OutputRef, OutputRefError};
pub use context::ExecutionContext;
pub use module::{Configuration, Module, ModuleKind};
pub use module_type::{InputDef, ModuleType, OutputDef};
pub use property::{object_value, PropertyAccess};
pub use rule::{Rule, RuleConfig, RuleError, RuleResult};
pub use tags::TagSet;

// Re-export minijinja Value, the dynamic value type used for configuration
// and context entries
pub use minijinja::Value;
