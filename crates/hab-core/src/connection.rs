//! Connections between module outputs and module inputs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for invalid output references
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OutputRefError {
    #[error("output reference must have the form 'moduleId.outputName'")]
    InvalidFormat,

    #[error("module id cannot be empty")]
    EmptyModuleId,

    #[error("output name cannot be empty")]
    EmptyOutputName,
}

/// Reference to a module output (e.g. "trigger1.event")
///
/// The textual form splits on the first '.', so output names may contain
/// further dots while module ids may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputRef {
    module_id: String,
    output_name: String,
}

impl OutputRef {
    /// Create a new reference from its parts
    pub fn new(
        module_id: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Result<Self, OutputRefError> {
        let module_id = module_id.into();
        let output_name = output_name.into();

        if module_id.is_empty() {
            return Err(OutputRefError::EmptyModuleId);
        }
        if output_name.is_empty() {
            return Err(OutputRefError::EmptyOutputName);
        }

        Ok(Self {
            module_id,
            output_name,
        })
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

impl FromStr for OutputRef {
    type Err = OutputRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module_id, output_name) = s.split_once('.').ok_or(OutputRefError::InvalidFormat)?;
        Self::new(module_id, output_name)
    }
}

impl TryFrom<String> for OutputRef {
    type Error = OutputRefError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OutputRef> for String {
    fn from(output: OutputRef) -> Self {
        output.to_string()
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module_id, self.output_name)
    }
}

/// How a connection came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionOrigin {
    /// Authored by the rule author
    Explicit,

    /// Deduced from tag matching
    Inferred,
}

/// An input of one module wired to an output of another (or the same) module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Output providing the value
    pub source: OutputRef,

    /// Module owning the input
    pub target_module: String,

    /// Input receiving the value
    pub input_name: String,

    pub origin: ConnectionOrigin,
}

impl Connection {
    pub fn explicit(
        source: OutputRef,
        target_module: impl Into<String>,
        input_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target_module: target_module.into(),
            input_name: input_name.into(),
            origin: ConnectionOrigin::Explicit,
        }
    }

    pub fn inferred(
        source: OutputRef,
        target_module: impl Into<String>,
        input_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target_module: target_module.into(),
            input_name: input_name.into(),
            origin: ConnectionOrigin::Inferred,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} <- {}",
            self.target_module, self.input_name, self.source
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_ref() {
        let output: OutputRef = "trigger1.event".parse().unwrap();
        assert_eq!(output.module_id(), "trigger1");
        assert_eq!(output.output_name(), "event");
        assert_eq!(output.to_string(), "trigger1.event");
    }

    #[test]
    fn test_output_name_may_contain_dots() {
        let output: OutputRef = "action1.result.value".parse().unwrap();
        assert_eq!(output.module_id(), "action1");
        assert_eq!(output.output_name(), "result.value");
    }

    #[test]
    fn test_invalid_output_refs() {
        assert_eq!(
            "nodot".parse::<OutputRef>(),
            Err(OutputRefError::InvalidFormat)
        );
        assert_eq!(
            ".event".parse::<OutputRef>(),
            Err(OutputRefError::EmptyModuleId)
        );
        assert_eq!(
            "trigger1.".parse::<OutputRef>(),
            Err(OutputRefError::EmptyOutputName)
        );
    }

    #[test]
    fn test_connection_display() {
        let connection =
            Connection::inferred("t1.out3".parse().unwrap(), "c1", "in2");
        assert_eq!(connection.to_string(), "c1.in2 <- t1.out3");
    }
}
