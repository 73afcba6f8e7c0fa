//! Property-bearing objects
//!
//! Values placed into an execution context are either keyed containers
//! (maps) or objects that expose named properties. The latter implement
//! [`PropertyAccess`] and are wrapped into a [`Value`] with [`object_value`].

use minijinja::value::{Object, ObjectRepr};
use std::fmt;
use std::sync::Arc;

use crate::Value;

/// Named property access for context objects
///
/// Implemented per concrete type. Returning `None` means the object has no
/// such property.
pub trait PropertyAccess: fmt::Debug + Send + Sync + 'static {
    /// Get the value of a named property
    fn get_property(&self, name: &str) -> Option<Value>;
}

/// Wraps a property-bearing object so it can travel as a [`Value`]
struct PropertyObject<T>(T);

impl<T: PropertyAccess> fmt::Debug for PropertyObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: PropertyAccess> Object for PropertyObject<T> {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        self.0.get_property(key.as_str()?)
    }
}

/// Wrap a property-bearing object into a dynamic value
pub fn object_value<T: PropertyAccess>(object: T) -> Value {
    Value::from_object(PropertyObject(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::value::ValueKind;

    #[derive(Debug)]
    struct Bean {
        name: String,
    }

    impl PropertyAccess for Bean {
        fn get_property(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name.clone())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_object_value_exposes_properties() {
        let value = object_value(Bean {
            name: "kitchen".to_string(),
        });

        assert_eq!(value.kind(), ValueKind::Plain);
        assert_eq!(value.get_attr("name").unwrap().as_str(), Some("kitchen"));
        assert!(value.get_attr("missing").unwrap().is_undefined());
    }
}
