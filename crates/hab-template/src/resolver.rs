//! Resolution of configuration and composite child contexts
//!
//! Both entry points are pure: they read the execution context and return a
//! new snapshot, leaving the module definition untouched so several runs of
//! the same rule can resolve concurrently.

use hab_core::{Configuration, ExecutionContext, Value};
use indexmap::IndexMap;
use tracing::trace;

use crate::path::get_value;
use crate::template::{is_template, references, whole_reference};

/// Resolve a reference name against a context viewed as a container
///
/// A name made only of whitespace and `.` separators names nothing and never
/// resolves, even though the same path handed to [`get_value`] is the root.
pub fn resolve_reference(name: &str, scope: &Value) -> Option<Value> {
    if name.chars().all(|c| c == '.' || c.is_whitespace()) {
        return None;
    }
    get_value(scope, name)
}

/// Substitute every token of a text with the text form of its value
///
/// Unresolved tokens are kept literally when `keep_unresolved` is set;
/// otherwise the whole substitution fails.
fn substitute(text: &str, scope: &Value, keep_unresolved: bool) -> Option<String> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for reference in references(text) {
        result.push_str(&text[last..reference.span.start]);
        match resolve_reference(reference.name, scope) {
            Some(value) => result.push_str(&value.to_string()),
            None if keep_unresolved => {
                trace!("Keeping unresolved reference '{}'", reference.name);
                result.push_str(&text[reference.span.clone()]);
            }
            None => return None,
        }
        last = reference.span.end;
    }

    result.push_str(&text[last..]);
    Some(result)
}

/// Resolve a single configuration value
///
/// A string that is exactly one `${name}` token becomes the referenced value
/// with its type preserved. Tokens embedded in other text are replaced by the
/// referenced value's text. Unresolved tokens stay as they are, and values
/// that are not strings are returned unchanged.
pub fn resolve_value(value: &Value, scope: &Value) -> Value {
    let Some(text) = value.as_str().filter(|text| is_template(text)) else {
        return value.clone();
    };

    if let Some(name) = whole_reference(text) {
        return match resolve_reference(name, scope) {
            Some(resolved) => resolved,
            None => {
                trace!("Reference '{}' not found in context", name);
                value.clone()
            }
        };
    }

    match substitute(text, scope, true) {
        Some(resolved) if resolved != text => Value::from(resolved),
        _ => value.clone(),
    }
}

/// Resolve every entry of a module configuration against a context
pub fn resolve_configuration(
    configuration: &Configuration,
    context: &ExecutionContext,
) -> Configuration {
    let scope = context.as_value();
    configuration
        .iter()
        .map(|(key, value)| (key.clone(), resolve_value(value, &scope)))
        .collect()
}

/// Build the execution context of a composite module's children
///
/// Each entry maps a child input name to a reference template evaluated
/// against the parent context. Entries that do not resolve are still present
/// in the child context, holding the undefined value rather than the
/// template text. Embedded templates resolve only when all of their tokens
/// do; text without tokens is copied as-is.
pub fn resolve_composite_child_context(
    child_references: &IndexMap<String, String>,
    parent: &ExecutionContext,
) -> ExecutionContext {
    let scope = parent.as_value();
    let mut child = ExecutionContext::new();

    for (input, template) in child_references {
        let value = match whole_reference(template) {
            Some(name) => resolve_reference(name, &scope),
            None => substitute(template, &scope, false).map(Value::from),
        };

        if value.is_none() {
            trace!("Child input '{}' unresolved from '{}'", input, template);
        }
        child.set(input.clone(), value.unwrap_or(Value::UNDEFINED));
    }

    child
}
