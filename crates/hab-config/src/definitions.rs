//! Module type and rule definitions loaded from YAML

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hab_automation::RuleManager;
use hab_core::{ModuleType, RuleConfig};
use hab_registries::ModuleTypeStore;
use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::loader::YamlLoader;
use crate::settings::EngineSettings;

/// Everything a definitions file can declare
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definitions {
    /// Engine settings
    #[serde(default, alias = "engine")]
    pub settings: EngineSettings,

    /// Module types to register
    #[serde(default)]
    pub module_types: Vec<ModuleType>,

    /// Rules to load
    #[serde(default, alias = "rule")]
    pub rules: Vec<RuleConfig>,
}

impl Definitions {
    /// Parse definitions from an already processed YAML value
    pub fn from_value(value: serde_yaml::Value, source: &Path) -> ConfigResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value).map_err(|e| ConfigError::InvalidDefinitions {
            path: source.to_path_buf(),
            source: e,
        })
    }

    /// Store holding the declared module types
    ///
    /// Fails when two declared types share a uid.
    pub fn module_type_store(&self) -> ConfigResult<ModuleTypeStore> {
        let store = ModuleTypeStore::new();
        for module_type in &self.module_types {
            store.register(module_type.clone())?;
        }
        Ok(store)
    }

    /// Build a rule manager with the declared types, settings and rules
    pub fn into_manager(self) -> ConfigResult<RuleManager> {
        let store = Arc::new(self.module_type_store()?);
        let manager = RuleManager::with_options(store, self.settings.connector_options());
        manager.load(self.rules)?;
        Ok(manager)
    }
}

/// Load definitions from a YAML file, resolving custom tags
pub fn load_definitions(
    config_dir: impl Into<PathBuf>,
    file: impl AsRef<Path>,
) -> ConfigResult<Definitions> {
    let mut loader = YamlLoader::new(config_dir);
    let source = loader.config_dir().join(file.as_ref());
    let value = loader.load_file(&source)?;
    let definitions = Definitions::from_value(value, &source)?;

    info!(
        "Loaded {} module types and {} rules from {:?}",
        definitions.module_types.len(),
        definitions.rules.len(),
        source
    );
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hab_core::ConnectionOrigin;
    use hab_registries::RegistryError;
    use tempfile::TempDir;

    const DEFINITIONS: &str = r#"
engine:
  allow_self_connections: false

module_types:
  - uid: core.ItemStateChangeTrigger
    kind: trigger
    outputs:
      - name: newState
        type: State
        tags: [state]
      - name: event
        tags: [event]
  - uid: core.ItemStateCondition
    kind: condition
    inputs:
      - name: state
        tags: [state]
        required: true
  - uid: core.ItemCommandAction
    kind: action
    inputs:
      - name: command
        tags: [command]

rules:
  - uid: motion_light
    name: Motion light
    triggers:
      - id: trigger1
        type: core.ItemStateChangeTrigger
        configuration:
          itemName: Motion_Sensor
    conditions:
      - id: condition1
        type: core.ItemStateCondition
    actions:
      - id: action1
        type: core.ItemCommandAction
        configuration:
          itemName: Hallway_Light
          command: "${trigger1.newState}"
        inputs:
          command: trigger1.newState
"#;

    #[test]
    fn test_load_definitions_and_build_manager() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("rules.yaml"), DEFINITIONS).unwrap();

        let definitions = load_definitions(dir.path(), "rules.yaml").unwrap();
        assert!(!definitions.settings.allow_self_connections);
        assert_eq!(definitions.module_types.len(), 3);
        assert_eq!(definitions.rules.len(), 1);

        let manager = definitions.into_manager().unwrap();
        assert!(!manager.options().allow_self_connections);

        let plan = manager.plan("motion_light").unwrap();
        let state = plan.source_of("condition1", "state").unwrap();
        assert_eq!(state.source.to_string(), "trigger1.newState");
        assert_eq!(state.origin, ConnectionOrigin::Inferred);

        let command = plan.source_of("action1", "command").unwrap();
        assert_eq!(command.origin, ConnectionOrigin::Explicit);
        assert!(plan.is_fully_connected());

        let rule = manager.get("motion_light").unwrap();
        assert_eq!(
            rule.actions[0].configuration["command"],
            serde_json::json!("${trigger1.newState}")
        );
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("empty.yaml"), "").unwrap();

        let definitions = load_definitions(dir.path(), "empty.yaml").unwrap();
        assert!(definitions.rules.is_empty());
        assert_eq!(definitions.settings, EngineSettings::default());
    }

    #[test]
    fn test_invalid_definitions() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "module_types: 5\n").unwrap();

        let result = load_definitions(dir.path(), "bad.yaml");
        assert!(matches!(result, Err(ConfigError::InvalidDefinitions { .. })));
    }

    #[test]
    fn test_duplicate_module_type_uid() {
        let yaml = r#"
module_types:
  - uid: core.ItemStateChangeTrigger
    kind: trigger
  - uid: core.ItemStateChangeTrigger
    kind: trigger
"#;
        let value = serde_yaml::from_str(yaml).unwrap();
        let definitions = Definitions::from_value(value, Path::new("inline.yaml")).unwrap();

        let result = definitions.into_manager();
        assert!(matches!(
            result,
            Err(ConfigError::ModuleType(RegistryError::AlreadyRegistered(uid)))
                if uid == "core.ItemStateChangeTrigger"
        ));
    }
}
