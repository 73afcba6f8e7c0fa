//! Module type registries
//!
//! The rule-wiring core never owns module types. It reads them through the
//! [`ModuleTypeRegistry`] trait, which callers implement over whatever
//! source they keep types in. [`ModuleTypeStore`] is the in-memory
//! implementation used by the rule manager and the tests.

pub mod module_type_registry;

pub use module_type_registry::{ModuleTypeRegistry, ModuleTypeStore, RegistryError, RegistryResult};
