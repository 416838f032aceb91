use crate::error::ChatResult;
use crate::keys::KeyCombo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Models offered in the picker, first entry is the fallback default
pub const DEFAULT_MODELS: &[&str] = &[
    "openai/chatgpt-5",
    "openai/gpt-4o-mini",
    "openai/gpt-4o",
    "openai/gpt-4.1-mini",
    "anthropic/claude-3.5-sonnet",
    "google/gemini-1.5-pro",
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // Hotkey
    pub hotkey: String,
    pub debounce_ms: u64,

    // Capture
    pub settle_ms: u64,

    // API
    pub api_url: String,
    pub api_key_env: String,
    pub request_timeout_secs: u64,
    pub http_referer: String,
    pub app_title: String,
    pub models: Vec<String>,

    // Meta
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkey: "Alt+Q".to_string(),
            debounce_ms: 300,
            settle_ms: 100,
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            request_timeout_secs: 30,
            http_referer: "https://yourapp.example".to_string(),
            app_title: "MouseChat Desktop".to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            log_level: "INFO".to_string(),
        }
    }
}

impl AppConfig {
    /// Load config from `path`. Missing file gives defaults; a corrupt file
    /// is renamed to `*.json.corrupt` and defaults are used.
    pub fn load_from(path: &Path) -> ChatResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                if let Err(e) = std::fs::rename(path, &backup_path) {
                    tracing::debug!("Could not move corrupt config to {:?}: {}", backup_path, e);
                }
                Ok(Self::default())
            }
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> ChatResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn combo(&self) -> ChatResult<KeyCombo> {
        KeyCombo::parse(&self.hotkey)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Model list with the built-in catalogue as fallback for an empty list
    pub fn model_list(&self) -> Vec<String> {
        if self.models.is_empty() {
            DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
        } else {
            self.models.clone()
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mousechat")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}
