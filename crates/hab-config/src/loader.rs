//! YAML loader with custom tag support

use crate::error::{ConfigError, ConfigResult};
use serde_yaml::value::TaggedValue;
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// YAML loader resolving `!include`, `!include_dir_merge_list` and `!env_var`
pub struct YamlLoader {
    /// Base directory for resolving relative paths
    config_dir: PathBuf,
    /// Files currently being loaded, to detect circular includes
    include_stack: HashSet<PathBuf>,
}

impl YamlLoader {
    /// Create a new loader for the given config directory
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            include_stack: HashSet::new(),
        }
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load and process a YAML file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = self.resolve_path(path.as_ref());
        debug!("Loading YAML file: {:?}", path);

        if self.include_stack.contains(&path) {
            return Err(ConfigError::CircularInclude { path });
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        self.include_stack.insert(path.clone());
        let result = self.load_string(&content, &path);
        self.include_stack.remove(&path);

        result
    }

    /// Load and process YAML from a string
    pub fn load_string(&mut self, content: &str, source_path: &Path) -> ConfigResult<Value> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source: e,
        })?;

        self.process_value(value, source_path)
    }

    fn process_value(&mut self, value: Value, source_path: &Path) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => self.process_tagged(*tagged, source_path),
            Value::Mapping(map) => {
                let mut result = serde_yaml::Mapping::new();
                for (k, v) in map {
                    result.insert(k, self.process_value(v, source_path)?);
                }
                Ok(Value::Mapping(result))
            }
            Value::Sequence(seq) => seq
                .into_iter()
                .map(|v| self.process_value(v, source_path))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            _ => Ok(value),
        }
    }

    fn process_tagged(&mut self, tagged: TaggedValue, source_path: &Path) -> ConfigResult<Value> {
        let tag = tagged.tag.to_string();
        trace!("Processing tag '{}' with value {:?}", tag, tagged.value);

        match tag.as_str() {
            "!include" => {
                let path = self.value_to_path(&tagged.value, source_path)?;
                debug!("Including file: {:?}", path);
                self.load_file(&path)
            }
            "!include_dir_merge_list" => {
                let dir = self.value_to_path(&tagged.value, source_path)?;
                debug!("Including directory as merged list: {:?}", dir);
                let mut result = Vec::new();
                for file in yaml_files(&dir)? {
                    match self.load_file(&file)? {
                        Value::Sequence(seq) => result.extend(seq),
                        Value::Null => {}
                        other => result.push(other),
                    }
                }
                Ok(Value::Sequence(result))
            }
            "!env_var" => process_env_var(&tagged.value),
            _ => {
                let value = self.process_value(tagged.value, source_path)?;
                Ok(Value::Tagged(Box::new(TaggedValue {
                    tag: tagged.tag,
                    value,
                })))
            }
        }
    }

    /// Convert a YAML value to a path, relative to the including file
    fn value_to_path(&self, value: &Value, source_path: &Path) -> ConfigResult<PathBuf> {
        let Value::String(path) = value else {
            return Err(ConfigError::InvalidIncludePath {
                path: format!("{:?}", value),
                reason: "path must be a string".to_string(),
            });
        };

        if Path::new(path).is_absolute() {
            return Ok(PathBuf::from(path));
        }
        let base_dir = source_path.parent().unwrap_or(&self.config_dir);
        Ok(base_dir.join(path))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }
}

/// `!env_var NAME` or `!env_var NAME default`
fn process_env_var(value: &Value) -> ConfigResult<Value> {
    let Value::String(spec) = value else {
        return Err(ConfigError::InvalidValue {
            key: "!env_var".to_string(),
            reason: "environment variable name must be a string".to_string(),
        });
    };

    let (name, default) = match spec.trim().split_once(char::is_whitespace) {
        Some((name, default)) => (name, Some(default.trim())),
        None => (spec.trim(), None),
    };

    match (std::env::var(name), default) {
        (Ok(env_value), _) => {
            debug!("Substituted env var: {}", name);
            Ok(Value::String(env_value))
        }
        (Err(_), Some(default)) => Ok(Value::String(default.to_string())),
        (Err(_), None) => Err(ConfigError::EnvVarNotFound {
            var: name.to_string(),
        }),
    }
}

/// All YAML files in a directory, sorted by name
fn yaml_files(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConfigError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| ConfigError::ReadFile {
            path: dir.to_path_buf(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Load a YAML file with tag processing
pub fn load_yaml(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Value> {
    YamlLoader::new(config_dir).load_file(file)
}

/// Load a YAML string with tag processing
pub fn load_yaml_string(
    config_dir: impl Into<PathBuf>,
    content: &str,
    source_name: &str,
) -> ConfigResult<Value> {
    let mut loader = YamlLoader::new(config_dir);
    let source = loader.config_dir().join(source_name);
    loader.load_string(content, &source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn get<'a>(value: &'a Value, key: &str) -> &'a Value {
        value.as_mapping().unwrap().get(key).unwrap()
    }

    #[test]
    fn test_include() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "types.yaml", "- uid: a\n- uid: b\n");
        write_file(dir.path(), "main.yaml", "module_types: !include types.yaml\n");

        let value = load_yaml(dir.path(), "main.yaml").unwrap();
        assert_eq!(get(&value, "module_types").as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_include_dir_merge_list() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "rules/a.yaml", "- uid: one\n- uid: two\n");
        write_file(dir.path(), "rules/b.yml", "uid: three\n");
        write_file(dir.path(), "rules/notes.txt", "ignored");
        write_file(dir.path(), "main.yaml", "rules: !include_dir_merge_list rules\n");

        let value = load_yaml(dir.path(), "main.yaml").unwrap();
        let rules = get(&value, "rules").as_sequence().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(get(&rules[2], "uid").as_str(), Some("three"));
    }

    #[test]
    fn test_missing_include_dir() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "main.yaml", "rules: !include_dir_merge_list nowhere\n");

        let result = load_yaml(dir.path(), "main.yaml");
        assert!(matches!(result, Err(ConfigError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_circular_include_detection() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.yaml", "b: !include b.yaml\n");
        write_file(dir.path(), "b.yaml", "a: !include a.yaml\n");

        let result = load_yaml(dir.path(), "a.yaml");
        assert!(matches!(result, Err(ConfigError::CircularInclude { .. })));
    }

    #[test]
    fn test_env_var_with_default() {
        let value = load_yaml_string(
            "/config",
            "level: !env_var HAB_TEST_SURELY_UNSET_VAR debug\n",
            "inline.yaml",
        )
        .unwrap();
        assert_eq!(get(&value, "level").as_str(), Some("debug"));
    }

    #[test]
    fn test_env_var_missing() {
        let result = load_yaml_string(
            "/config",
            "level: !env_var HAB_TEST_SURELY_UNSET_VAR\n",
            "inline.yaml",
        );
        assert!(matches!(result, Err(ConfigError::EnvVarNotFound { var }) if var == "HAB_TEST_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let value = load_yaml_string("/config", "x: !custom 1\n", "inline.yaml").unwrap();
        assert!(matches!(get(&value, "x"), Value::Tagged(_)));
    }

    #[test]
    fn test_parse_error() {
        let result = load_yaml_string("/config", "a: [unclosed\n", "inline.yaml");
        assert!(matches!(result, Err(ConfigError::ParseYaml { .. })));
    }
}
