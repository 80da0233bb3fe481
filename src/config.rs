use crate::model::animation::DEFAULT_MAX_JITTER_MS;
use crate::model::refactor::RefactorSettings;
use crate::model::source::Language;
use crate::services::api::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable that overrides `api_base_url`
pub const API_URL_ENV: &str = "REFACTOR_API_URL";

/// Named animation speeds offered in the settings dialog
pub const SPEED_PRESETS: [(&str, u64); 5] = [
    ("Fast", 10),
    ("Normal", 20),
    ("Steady", 30),
    ("Slow", 50),
    ("Very slow", 100),
];

pub const DEFAULT_SPEED_MS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub language: Language,
    /// Base per-character delay of the typing animation
    pub animation_speed_ms: u64,
    pub max_jitter_ms: u64,
    pub request_timeout_secs: u64,
    /// Where downloads are written
    pub output_dir: PathBuf,
    pub settings: RefactorSettings,
    /// Value of `REFACTOR_API_URL` at load time; never written back
    #[serde(skip)]
    pub api_url_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            language: Language::JavaScript,
            animation_speed_ms: DEFAULT_SPEED_MS,
            max_jitter_ms: DEFAULT_MAX_JITTER_MS,
            request_timeout_secs: 120,
            output_dir: PathBuf::from("."),
            settings: RefactorSettings::default(),
            api_url_override: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".refactor-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read a config file; `None` when it is missing or unreadable
    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt config");
                None
            }
        }
    }

    /// Saved config (or defaults) with the environment override applied
    pub fn load_or_default() -> Config {
        Self::load()
            .unwrap_or_default()
            .with_api_url_override(env::var(API_URL_ENV).ok())
    }

    pub fn with_api_url_override(mut self, url: Option<String>) -> Self {
        self.api_url_override = url.filter(|u| !u.trim().is_empty());
        if let Some(ref url) = self.api_url_override {
            info!(url = %url, "using API URL from environment");
        }
        self
    }

    /// Base URL actually used for requests
    pub fn effective_base_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or(&self.api_base_url)
    }

    /// Label of the preset matching the current speed, if any
    pub fn speed_label(&self) -> &str {
        SPEED_PRESETS
            .iter()
            .find(|(_, ms)| *ms == self.animation_speed_ms)
            .map(|(label, _)| *label)
            .unwrap_or("Custom")
    }

    /// Step to the next slower preset, wrapping around to the fastest
    ///
    /// A custom speed moves to the first preset above it.
    pub fn cycle_speed(&mut self) {
        self.animation_speed_ms = SPEED_PRESETS
            .iter()
            .map(|(_, ms)| *ms)
            .find(|ms| *ms > self.animation_speed_ms)
            .unwrap_or(SPEED_PRESETS[0].1);
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create config directory if it doesn't exist
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        info!(path = %path.display(), "config saved");

        Ok(())
    }
}
