//! Configuration-file readers used by collaborator tooling.
//!
//! Two small readers: a `[section] key = value` settings file named by an
//! environment variable, flattened into `section_key` lookups, and a YAML
//! loader that always yields a mapping.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Flattened key/value settings read from a file named by an environment
/// variable.
///
/// File format is `[section]` headers with `key = value` entries; values are
/// looked up as `section_key`:
///
/// ```text
/// [pushover]
/// token = "abc"
/// ```
///
/// is read back with `settings.get("pushover_token")`.
#[derive(Debug, Clone)]
pub struct FileSettings {
    values: BTreeMap<String, String>,
}

impl FileSettings {
    /// Read the settings file named by `env_var`.
    ///
    /// An unset variable is a configuration error.
    pub fn from_env(env_var: &str) -> Result<Self> {
        let path = std::env::var(env_var)
            .map_err(|_| Error::Config(format!("environment variable {} not set", env_var)))?;
        Self::from_file(Path::new(&path))
    }

    /// Read a settings file directly.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| Error::Config(e.to_string()))?;

        let mut values = BTreeMap::new();
        for (section, entry) in table {
            match entry {
                toml::Value::Table(section_table) => {
                    for (key, value) in section_table {
                        let flat = format!("{}_{}", section.to_lowercase(), key.to_lowercase());
                        values.insert(flat, value_to_string(value));
                    }
                }
                // Top-level keys outside a section keep their own name.
                other => {
                    values.insert(section.to_lowercase(), value_to_string(other));
                }
            }
        }

        Ok(Self { values })
    }

    /// Look up a flattened `section_key` value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

fn value_to_string(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Load a YAML file as a mapping.
///
/// An empty file or a non-mapping document yields an empty mapping.
pub fn load_yaml_mapping(path: &Path) -> Result<serde_yaml::Mapping> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;

    match value {
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        _ => Ok(serde_yaml::Mapping::new()),
    }
}
