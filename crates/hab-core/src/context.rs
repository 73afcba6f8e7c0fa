//! Execution context holding the values a running rule has produced

use indexmap::IndexMap;

use crate::Value;

/// Values available to modules while a rule runs
///
/// Keys are plain names (e.g. "event") or `"moduleId.outputName"` for
/// module outputs. The execution engine fills the context incrementally; the
/// reference resolver only reads it.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    values: IndexMap<String, Value>,
}

impl ExecutionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Set a value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Set a value, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Record a module output under `"moduleId.outputName"`
    pub fn set_output(&mut self, module_id: &str, output_name: &str, value: impl Into<Value>) {
        self.values
            .insert(format!("{}.{}", module_id, output_name), value.into());
    }

    /// Get a value by exact key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// View the whole context as a keyed container value
    pub fn as_value(&self) -> Value {
        Value::from_iter(self.iter().map(|(k, v)| (k, v.clone())))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ExecutionContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::value::ValueKind;

    #[test]
    fn test_set_and_get() {
        let mut ctx = ExecutionContext::new();
        ctx.set("brightness", 255);
        ctx.set_output("trigger1", "event", "ON");

        assert_eq!(ctx.get("brightness").and_then(Value::as_i64), Some(255));
        assert_eq!(
            ctx.get("trigger1.event").and_then(Value::as_str),
            Some("ON")
        );
        assert!(ctx.get("nonexistent").is_none());
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_as_value_is_map() {
        let ctx = ExecutionContext::new().with("a.b", "dotted").with("a", 1);
        let value = ctx.as_value();

        assert_eq!(value.kind(), ValueKind::Map);
        assert_eq!(
            value.get_item(&Value::from("a.b")).unwrap().as_str(),
            Some("dotted")
        );
    }
}
