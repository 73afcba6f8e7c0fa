//! Rule wiring
//!
//! This crate connects the modules of a rule and manages the lifecycle of
//! rules and their connections.
//!
//! # Architecture
//!
//! ```text
//! RULE + MODULE TYPE REGISTRY → CONNECTOR → CONNECTION PLAN
//! ```
//!
//! - **Explicit connections**: authored as `"moduleId.outputName"` and kept verbatim
//! - **Inferred connections**: an unwired input is connected to the single
//!   output, among all modules of the rule, whose tags contain the input's tags
//! - **Diagnostics**: unknown types and unmatched or ambiguous inputs
//!
//! # Key Types
//!
//! - [`resolve_connections`] - Build the connection plan of one rule
//! - [`ConnectionPlan`] - Connections plus diagnostics
//! - [`RuleManager`] - Holds all rules, rebuilding connections on change

pub mod connector;
pub mod manager;

pub use connector::{
    resolve_connections, ConnectionPlan, ConnectorError, ConnectorOptions, ConnectorResult,
    Diagnostic,
};
pub use manager::{ManagedRule, RuleManager, RuleManagerError, RuleManagerResult};
