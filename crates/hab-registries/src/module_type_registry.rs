//! Module Type Registry
//!
//! Read-only lookup of module types by uid, plus an in-memory store.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hab_core::ModuleType;
use thiserror::Error;
use tracing::{debug, info};

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Module type already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Module type registry unavailable: {0}")]
    Unavailable(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Read-only access to module types
///
/// `Ok(None)` means the type is unknown. `Err` means the registry itself
/// could not answer; callers propagate it.
pub trait ModuleTypeRegistry: Send + Sync {
    /// Get a module type by uid
    fn get(&self, type_uid: &str) -> RegistryResult<Option<Arc<ModuleType>>>;
}

impl<T: ModuleTypeRegistry + ?Sized> ModuleTypeRegistry for Arc<T> {
    fn get(&self, type_uid: &str) -> RegistryResult<Option<Arc<ModuleType>>> {
        (**self).get(type_uid)
    }
}

/// In-memory module type store
///
/// Entries are stored as `Arc<ModuleType>` so lookups never clone a type.
#[derive(Debug, Default)]
pub struct ModuleTypeStore {
    by_uid: DashMap<String, Arc<ModuleType>>,
}

impl ModuleTypeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            by_uid: DashMap::new(),
        }
    }

    /// Create a store holding the given types, later duplicates win
    pub fn with_types(types: impl IntoIterator<Item = ModuleType>) -> Self {
        let store = Self::new();
        for module_type in types {
            store.upsert(module_type);
        }
        store
    }

    /// Register a new module type
    ///
    /// Returns `Err` if a type with the same uid already exists.
    pub fn register(&self, module_type: ModuleType) -> RegistryResult<Arc<ModuleType>> {
        let uid = module_type.uid.clone();
        match self.by_uid.entry(uid) {
            Entry::Occupied(entry) => {
                Err(RegistryError::AlreadyRegistered(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                let module_type = Arc::new(module_type);
                info!(
                    "Registered {} module type: {}",
                    module_type.kind, module_type.uid
                );
                entry.insert(Arc::clone(&module_type));
                Ok(module_type)
            }
        }
    }

    /// Insert or replace a module type
    pub fn upsert(&self, module_type: ModuleType) -> Arc<ModuleType> {
        let module_type = Arc::new(module_type);
        if self
            .by_uid
            .insert(module_type.uid.clone(), Arc::clone(&module_type))
            .is_some()
        {
            debug!("Replaced module type: {}", module_type.uid);
        }
        module_type
    }

    /// Get a module type by uid
    pub fn lookup(&self, type_uid: &str) -> Option<Arc<ModuleType>> {
        self.by_uid.get(type_uid).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.by_uid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uid.is_empty()
    }
}

impl ModuleTypeRegistry for ModuleTypeStore {
    fn get(&self, type_uid: &str) -> RegistryResult<Option<Arc<ModuleType>>> {
        Ok(self.lookup(type_uid))
    }
}
