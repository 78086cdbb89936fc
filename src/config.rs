use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

const BASE_URL_ENV: &str = "GHIBLI_ART_BASE_URL";
const GENERATE_PATH_ENV: &str = "GHIBLI_ART_GENERATE_PATH";
const TIMEOUT_ENV: &str = "GHIBLI_ART_TIMEOUT_MS";

/// Where the generation endpoint lives and how long to wait for it.
///
/// Values come from, in increasing priority:
/// 1. built-in defaults (local development backend)
/// 2. `config.json` in the user's config directory
/// 3. `GHIBLI_ART_*` environment variables
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin of the generation server, e.g. `http://localhost:5000`
    pub base_url: String,
    /// Path of the generation endpoint on that server
    pub generate_path: String,
    /// Upper bound for a whole request/response round trip
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            generate_path: "/ghibli-art".to_string(),
            timeout_ms: 60_000,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.endpoint()?;
        Ok(config)
    }

    /// Get the path where the config file is expected
    ///
    /// - Linux: ~/.config/ghibli-art/config.json
    /// - macOS: ~/Library/Application Support/ghibli-art/config.json
    /// - Windows: %APPDATA%\ghibli-art\config.json
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("ghibli-art");
        path.push("config.json");
        Some(path)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_json(&raw)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Apply `GHIBLI_ART_*` overrides looked up through `var`
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = var(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(path) = var(GENERATE_PATH_ENV) {
            self.generate_path = path;
        }
        if let Some(timeout) = var(TIMEOUT_ENV) {
            self.timeout_ms = timeout
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: TIMEOUT_ENV,
                    value: timeout,
                })?;
        }
        Ok(())
    }

    /// Full address of the generation endpoint
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "base_url",
                value: self.base_url.clone(),
            });
        }
        Ok(base.join(&self.generate_path)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
