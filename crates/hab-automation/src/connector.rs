//! Tag-based auto-connection of module inputs
//!
//! Every input that the rule author left unwired is matched against the
//! outputs of all modules in the same rule. An output is compatible when it
//! carries every tag the input asks for. The input is wired only when exactly
//! one output is compatible; no match and several matches both leave the
//! input unbound and are reported as diagnostics.

use std::fmt;

use hab_core::{Connection, Module, ModuleType, OutputRef, OutputRefError, Rule, TagSet};
use hab_registries::{ModuleTypeRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Module type lookup for '{type_uid}' failed in rule {rule_uid}: {source}")]
    Registry {
        rule_uid: String,
        type_uid: String,
        #[source]
        source: RegistryError,
    },
}

/// Result type for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Connector behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorOptions {
    /// Offer a module's own outputs as candidates for its own inputs
    #[serde(default = "default_true")]
    pub allow_self_connections: bool,

    /// Log inputs left unbound (warn for required inputs, debug otherwise)
    #[serde(default = "default_true")]
    pub log_unresolved: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            allow_self_connections: true,
            log_unresolved: true,
        }
    }
}

/// Why an input or module was not wired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The registry does not know the module's type
    UnknownModuleType { module_id: String, type_uid: String },

    /// No output carries the input's tags
    Unmatched {
        module_id: String,
        input: String,
        required: bool,
    },

    /// More than one output carries the input's tags
    Ambiguous {
        module_id: String,
        input: String,
        required: bool,
        candidates: Vec<OutputRef>,
    },

    /// An explicit connection is not of the form "moduleId.outputName"
    MalformedExplicitConnection {
        module_id: String,
        input: String,
        reference: String,
        error: OutputRefError,
    },

    /// A module output cannot be referenced (empty module id or output name)
    ///
    /// The output still counts when matching inputs, but is never wired.
    MalformedOutput {
        module_id: String,
        output: String,
        error: OutputRefError,
    },
}

impl Diagnostic {
    /// Module the diagnostic is about
    pub fn module_id(&self) -> &str {
        match self {
            Diagnostic::UnknownModuleType { module_id, .. }
            | Diagnostic::Unmatched { module_id, .. }
            | Diagnostic::Ambiguous { module_id, .. }
            | Diagnostic::MalformedExplicitConnection { module_id, .. }
            | Diagnostic::MalformedOutput { module_id, .. } => module_id,
        }
    }

    /// Input the diagnostic is about, if any
    pub fn input(&self) -> Option<&str> {
        match self {
            Diagnostic::UnknownModuleType { .. } | Diagnostic::MalformedOutput { .. } => None,
            Diagnostic::Unmatched { input, .. }
            | Diagnostic::Ambiguous { input, .. }
            | Diagnostic::MalformedExplicitConnection { input, .. } => Some(input),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownModuleType {
                module_id,
                type_uid,
            } => write!(f, "module {} has unknown type {}", module_id, type_uid),
            Diagnostic::Unmatched {
                module_id, input, ..
            } => write!(f, "no output matches input {}.{}", module_id, input),
            Diagnostic::Ambiguous {
                module_id,
                input,
                candidates,
                ..
            } => {
                write!(f, "input {}.{} matches ", module_id, input)?;
                for (i, candidate) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", candidate)?;
                }
                Ok(())
            }
            Diagnostic::MalformedExplicitConnection {
                module_id,
                input,
                reference,
                error,
            } => write!(
                f,
                "input {}.{} references '{}': {}",
                module_id, input, reference, error
            ),
            Diagnostic::MalformedOutput {
                module_id,
                output,
                error,
            } => write!(f, "output '{}' of module {}: {}", output, module_id, error),
        }
    }
}

/// Connections of a rule plus the diagnostics gathered while resolving them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPlan {
    rule_uid: String,
    connections: Vec<Connection>,
    diagnostics: Vec<Diagnostic>,
}

impl ConnectionPlan {
    pub fn rule_uid(&self) -> &str {
        &self.rule_uid
    }

    /// All connections, explicit and inferred, module by module
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Connections feeding the inputs of one module
    pub fn connections_for<'a>(&'a self, module_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.target_module == module_id)
    }

    /// Connection feeding a specific input
    pub fn source_of(&self, module_id: &str, input: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.target_module == module_id && c.input_name == input)
    }

    /// True when every declared input was wired and every type was known
    pub fn is_fully_connected(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consume the plan, keeping only the connections
    pub fn into_connections(self) -> Vec<Connection> {
        self.connections
    }
}

/// An output offered to unwired inputs
///
/// `source` is an error for outputs that cannot be referenced; they still
/// take part in the match count so they can make an input ambiguous.
struct Candidate<'a> {
    source: Result<OutputRef, OutputRefError>,
    module_id: &'a str,
    tags: &'a TagSet,
}

/// Wire the inputs of a rule's modules
///
/// Explicit connections are copied verbatim. Each declared input without an
/// explicit connection is matched by tag containment against every output
/// of every module in the rule, the module's own outputs included unless
/// `options.allow_self_connections` is off. Only a unique match is wired.
///
/// Unknown module types contribute no outputs and get no inferred inputs;
/// they are reported as diagnostics. Only registry failures are errors.
pub fn resolve_connections<R>(
    rule: &Rule,
    registry: &R,
    options: ConnectorOptions,
) -> ConnectorResult<ConnectionPlan>
where
    R: ModuleTypeRegistry + ?Sized,
{
    let mut diagnostics = Vec::new();
    let mut typed: Vec<(&Module, Option<Arc<ModuleType>>)> = Vec::new();

    for module in rule.modules() {
        let module_type =
            registry
                .get(&module.type_uid)
                .map_err(|source| ConnectorError::Registry {
                    rule_uid: rule.uid.clone(),
                    type_uid: module.type_uid.clone(),
                    source,
                })?;

        if module_type.is_none() {
            warn!(
                "Rule {}: module {} has unknown type {}",
                rule.uid, module.id, module.type_uid
            );
            diagnostics.push(Diagnostic::UnknownModuleType {
                module_id: module.id.clone(),
                type_uid: module.type_uid.clone(),
            });
        }
        typed.push((module, module_type));
    }

    let mut pool: Vec<Candidate<'_>> = Vec::new();
    for (module, module_type) in &typed {
        let Some(module_type) = module_type else {
            continue;
        };
        for output in &module_type.outputs {
            let source = OutputRef::new(module.id.as_str(), output.name.as_str());
            if let Err(error) = &source {
                warn!(
                    "Rule {}: output '{}' of module {} cannot be referenced: {}",
                    rule.uid, output.name, module.id, error
                );
                diagnostics.push(Diagnostic::MalformedOutput {
                    module_id: module.id.clone(),
                    output: output.name.clone(),
                    error: error.clone(),
                });
            }
            pool.push(Candidate {
                source,
                module_id: module.id.as_str(),
                tags: &output.tags,
            });
        }
    }
    trace!("Rule {}: {} candidate outputs", rule.uid, pool.len());

    let mut connections = Vec::new();

    for (module, module_type) in &typed {
        for (input, reference) in &module.inputs {
            match reference.parse::<OutputRef>() {
                Ok(source) => connections.push(Connection::explicit(source, &module.id, input)),
                Err(error) => {
                    warn!(
                        "Rule {}: input {}.{} has malformed reference '{}'",
                        rule.uid, module.id, input, reference
                    );
                    diagnostics.push(Diagnostic::MalformedExplicitConnection {
                        module_id: module.id.clone(),
                        input: input.clone(),
                        reference: reference.clone(),
                        error,
                    });
                }
            }
        }

        let Some(module_type) = module_type else {
            continue;
        };

        for input in &module_type.inputs {
            if module.is_explicitly_connected(&input.name) {
                continue;
            }

            let matches: Vec<&Candidate<'_>> = pool
                .iter()
                .filter(|c| options.allow_self_connections || c.module_id != module.id)
                .filter(|c| input.tags.is_subset_of(c.tags))
                .collect();

            match matches.as_slice() {
                [Candidate {
                    source: Ok(source), ..
                }] => {
                    debug!(
                        "Rule {}: connected {}.{} to {}",
                        rule.uid, module.id, input.name, source
                    );
                    connections.push(Connection::inferred(
                        source.clone(),
                        &module.id,
                        &input.name,
                    ));
                }
                [Candidate { source: Err(_), .. }] => {
                    // Already reported as a malformed output
                    log_unresolved(
                        options,
                        rule,
                        module,
                        input.required,
                        &input.name,
                        "only match cannot be referenced",
                    );
                }
                [] => {
                    log_unresolved(options, rule, module, input.required, &input.name, "no match");
                    diagnostics.push(Diagnostic::Unmatched {
                        module_id: module.id.clone(),
                        input: input.name.clone(),
                        required: input.required,
                    });
                }
                several => {
                    log_unresolved(options, rule, module, input.required, &input.name, "ambiguous");
                    diagnostics.push(Diagnostic::Ambiguous {
                        module_id: module.id.clone(),
                        input: input.name.clone(),
                        required: input.required,
                        candidates: several
                            .iter()
                            .filter_map(|c| c.source.clone().ok())
                            .collect(),
                    });
                }
            }
        }
    }

    Ok(ConnectionPlan {
        rule_uid: rule.uid.clone(),
        connections,
        diagnostics,
    })
}

fn log_unresolved(
    options: ConnectorOptions,
    rule: &Rule,
    module: &Module,
    required: bool,
    input: &str,
    reason: &str,
) {
    if !options.log_unresolved {
        return;
    }
    if required {
        warn!(
            "Rule {}: required input {}.{} left unbound ({})",
            rule.uid, module.id, input, reason
        );
    } else {
        debug!(
            "Rule {}: input {}.{} left unbound ({})",
            rule.uid, module.id, input, reason
        );
    }
}
