//! Engine settings

use hab_automation::ConnectorOptions;
use serde::{Deserialize, Serialize};

/// Settings of the rule-wiring engine (`engine:` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Let a module's own outputs feed its own unwired inputs
    #[serde(default = "default_true")]
    pub allow_self_connections: bool,

    /// Log inputs the connector leaves unbound
    #[serde(default = "default_true")]
    pub log_unresolved_inputs: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            allow_self_connections: true,
            log_unresolved_inputs: true,
        }
    }
}

impl EngineSettings {
    /// Connector options derived from these settings
    pub fn connector_options(&self) -> ConnectorOptions {
        ConnectorOptions {
            allow_self_connections: self.allow_self_connections,
            log_unresolved: self.log_unresolved_inputs,
        }
    }
}
