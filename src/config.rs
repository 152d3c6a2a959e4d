//! Runtime settings.
//!
//! Each setting resolves in priority order: CLI flag, environment variable,
//! `config.json` in the data directory, built-in default. The API key is
//! read from the environment only so it never lands in a file we manage.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "LEXDRAFT_MODEL";
pub const ENV_LM_COMMAND: &str = "LEXDRAFT_LM_COMMAND";
pub const ENV_API_BASE: &str = "LEXDRAFT_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "LEXDRAFT_TIMEOUT_SECS";
pub const ENV_DATA_DIR: &str = "LEXDRAFT_DATA_DIR";

const CONFIG_FILE: &str = "config.json";

/// Optional `config.json` in the data directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub lm_command: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Missing file reads as an empty config.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err).with_context(|| format!("read config {}", path.display())),
        };
        serde_json::from_slice(&bytes).with_context(|| format!("parse config {}", path.display()))
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub lm_command: Option<String>,
    pub model: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub lm_log: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub lm_command: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
    pub data_dir: PathBuf,
    pub lm_log: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against a custom environment lookup.
    pub fn resolve_with<F>(overrides: Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let data_dir = match overrides.data_dir.or_else(|| lookup(ENV_DATA_DIR).map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let file = FileConfig::load(&data_dir)?;

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(anyhow!("model timeout must be at least one second"));
        }

        Ok(Self {
            api_key: lookup(ENV_API_KEY),
            model: overrides
                .model
                .or_else(|| lookup(ENV_MODEL))
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            lm_command: overrides
                .lm_command
                .or_else(|| lookup(ENV_LM_COMMAND))
                .or(file.lm_command),
            api_base: lookup(ENV_API_BASE)
                .or(file.api_base)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            data_dir,
            lm_log: overrides.lm_log,
        })
    }

    /// Gemini is the active backend but no key is configured.
    pub fn missing_api_key(&self) -> bool {
        self.lm_command.is_none() && self.api_key.is_none()
    }

    pub fn warn_if_unconfigured(&self) {
        if self.missing_api_key() {
            tracing::warn!(
                "{ENV_API_KEY} is not set; model calls will fail until it is exported or --lm is given"
            );
        }
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("cannot determine home directory; pass --data-dir"))?;
    Ok(base.join("lexdraft"))
}
