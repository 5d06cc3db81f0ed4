//! formgen configuration
//!
//! Resolution order, last wins:
//!   1. Built-in defaults
//!   2. YAML file (`~/.config/formgen/config.yaml` or an explicit path)
//!   3. Environment overrides (`FORMGEN_BIND`, `FORMGEN_MODEL`,
//!      `OPENAI_BASE_URL`, `FORMGEN_LOG`)
//!
//! The API key is never stored in the file. It is read from the environment
//! variable named by `completion.api_key_env` when a client is built.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("{0} not set. Export your API key.")]
    MissingApiKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Idle sessions older than this are dropped
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            session_ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API, without `/chat/completions`
    pub api_base: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl CompletionConfig {
    /// Resolve the API key from the process environment
    pub fn api_key(&self) -> Result<String> {
        self.api_key_from(|key| std::env::var(key).ok())
    }

    /// Resolve the API key through `lookup`. Empty values count as unset.
    pub fn api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "formgen=info,tower_http=info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub log: LogConfig,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("formgen").join("config.yaml"))
    }

    /// Load defaults, the config file and the environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = lookup("FORMGEN_BIND") {
            if bind.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "FORMGEN_BIND",
                    value: bind,
                });
            }
            self.server.bind = bind;
        }
        if let Some(model) = lookup("FORMGEN_MODEL") {
            if !model.trim().is_empty() {
                self.completion.model = model;
            }
        }
        if let Some(base) = lookup("OPENAI_BASE_URL") {
            if !base.trim().is_empty() {
                self.completion.api_base = base.trim_end_matches('/').to_string();
            }
        }
        if let Some(filter) = lookup("FORMGEN_LOG") {
            self.log.filter = filter;
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
