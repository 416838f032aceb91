//! Persistent key-value settings
//!
//! Holds the values that survive between sessions: last-used model,
//! prompt history, theme and window geometry. Every read falls back to the
//! caller's default when the value is missing or does not decode, and
//! write failures are logged rather than returned.

use crate::error::{ChatError, ChatResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const KEY_CURRENT_MODEL: &str = "current_model";
pub const KEY_PROMPT_HISTORY: &str = "prompt_history";
pub const KEY_THEME: &str = "theme";
pub const KEY_WINDOW_GEOMETRY: &str = "window_geometry";

/// JSON-file backed settings store. `path: None` keeps values in memory.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    values: Map<String, Value>,
}

impl Store {
    /// Open the store at `path`. A missing file starts empty; a corrupt one
    /// is moved aside to `*.json.corrupt` and also starts empty. A file that
    /// cannot be read at all is left in place.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read_file(&path) {
            Ok(values) => values,
            Err(e @ (ChatError::Json(_) | ChatError::Persistence(_))) => {
                warn!("⚠️ Settings file corrupted, using defaults: {}", e);
                let backup = path.with_extension("json.corrupt");
                if let Err(e) = std::fs::rename(&path, &backup) {
                    debug!("Could not move corrupt settings to {:?}: {}", backup, e);
                }
                Map::new()
            }
            Err(e) => {
                warn!("⚠️ Settings file unreadable, using defaults: {}", e);
                Map::new()
            }
        };
        Self {
            path: Some(path),
            values,
        }
    }

    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Map::new(),
        }
    }

    fn read_file(path: &Path) -> ChatResult<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(ChatError::Persistence(format!(
                "expected a JSON object, found {}",
                other
            ))),
        }
    }

    /// Read `key`, or `default` if it is absent or has the wrong shape
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                debug!("Setting '{}' ignored: {}", key, e);
                default
            }),
            None => default,
        }
    }

    /// Store `value` under `key` and flush to disk
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.values.insert(key.to_string(), value);
            }
            Err(e) => {
                warn!("⚠️ Setting '{}' not serializable: {}", key, e);
                return;
            }
        }
        if let Err(e) = self.save() {
            warn!("⚠️ Failed to persist settings: {}", e);
        }
    }

    fn save(&self) -> ChatResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, content)
            .map_err(|e| ChatError::Persistence(format!("{}: {}", path.display(), e)))
    }

    /// History is stored as a JSON-encoded string list
    pub fn history(&self) -> Vec<String> {
        let encoded: String = self.get(KEY_PROMPT_HISTORY, String::new());
        if encoded.is_empty() {
            return Vec::new();
        }
        serde_json::from_str(&encoded).unwrap_or_else(|e| {
            debug!("Stored history ignored: {}", e);
            Vec::new()
        })
    }

    pub fn set_history(&mut self, entries: &[String]) {
        match serde_json::to_string(entries) {
            Ok(encoded) => self.set(KEY_PROMPT_HISTORY, encoded),
            Err(e) => warn!("⚠️ History not serializable: {}", e),
        }
    }
}
