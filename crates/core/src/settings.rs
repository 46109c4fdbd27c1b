//! Shared Settings Document
//!
//! Skills read user preferences (postal code, temperature unit, ...) from a
//! JSON object written by the settings editor. The file is re-read on every
//! lookup so edits apply without restarting the service.

use crate::error::SettingsError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document.
    pub fn load(&self) -> Result<Map<String, Value>, SettingsError> {
        if !self.path.exists() {
            return Err(SettingsError::NotFound(self.path.clone()));
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| SettingsError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        match serde_json::from_str::<Value>(&text).map_err(|e| SettingsError::Decode {
            path: self.path.clone(),
            source: e,
        })? {
            Value::Object(map) => Ok(map),
            _ => Err(SettingsError::NotAnObject(self.path.clone())),
        }
    }

    /// Returns the value stored under `key`, or `default` when the file is
    /// missing, unreadable or has no such key.
    pub fn get_config(&self, key: &str, default: Value) -> Value {
        match self.load() {
            Ok(mut map) => map.remove(key).unwrap_or(default),
            Err(e @ SettingsError::NotFound(_)) => {
                warn!(error = %e, "Configuration file (config.json) not found.");
                default
            }
            Err(e) => {
                error!(error = %e, "Could not read configuration. Please check for syntax errors.");
                default
            }
        }
    }

    /// Returns a non-empty setting as text. Numbers are accepted so that a
    /// postal code stored as `12345` still works.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get_config(key, Value::Null) {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
