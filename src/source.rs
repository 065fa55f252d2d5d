//! Configuration sources
//!
//! [`ConfigSource`] is an immutable snapshot of raw configuration data,
//! parsed from YAML or JSON. Sections are addressed by dotted path and bound
//! into typed options structs through serde. Reloading means constructing a
//! new snapshot and handing it to the registry; a source never changes under
//! a validator.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

/// An immutable snapshot of configuration data with named sections.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    root: Value,
}

impl ConfigSource {
    /// Creates an empty source with no sections.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: Value::Object(serde_json::Map::new()),
        }
    }

    /// Parses a YAML document into a source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let parsed: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?;
        let root = serde_json::to_value(parsed).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Ok(Self { root })
    }

    /// Parses a JSON document into a source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let root = serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Ok(Self { root })
    }

    /// Reads and parses a configuration file, choosing the format by
    /// extension (`.yaml`/`.yml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::UnsupportedFormat`] for an unrecognized extension, or
    /// [`ConfigError::Parse`] if the contents do not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Looks up a section by dotted path (`"server.limits"`), descending
    /// through nested mappings key by key.
    #[must_use]
    pub fn section(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for key in path.split('.') {
            current = current.as_object()?.get(key)?;
        }
        Some(current)
    }

    /// Returns `true` if the section exists and is not null.
    #[must_use]
    pub fn has_section(&self, path: &str) -> bool {
        self.section(path).is_some_and(|v| !v.is_null())
    }

    /// Binds a section into a typed options struct.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Bind`] if the section is missing or its shape
    /// does not deserialize into `T`.
    pub fn bind<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
        match self.section(section) {
            Some(value) if !value.is_null() => {
                serde_json::from_value(value.clone()).map_err(|e| ConfigError::Bind {
                    section: section.to_string(),
                    message: e.to_string(),
                })
            }
            _ => Err(ConfigError::Bind {
                section: section.to_string(),
                message: "section not found".to_string(),
            }),
        }
    }

    /// Binds a section, falling back to `T::default()` when the section is
    /// missing or null.
    ///
    /// This mirrors how configuration binders behave at startup: an absent
    /// section yields a default-constructed instance whose values are then
    /// judged by the declared rules, instead of aborting before validation
    /// can produce a readable report.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Bind`] if the section exists but does not
    /// deserialize into `T`.
    pub fn bind_or_default<T>(&self, section: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        match self.section(section) {
            Some(value) if !value.is_null() => {
                serde_json::from_value(value.clone()).map_err(|e| ConfigError::Bind {
                    section: section.to_string(),
                    message: e.to_string(),
                })
            }
            _ => Ok(T::default()),
        }
    }
}
