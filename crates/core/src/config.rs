use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
    assets::{DEFAULT_CONFIG, get_config_dir},
    model::ModelConfig,
    session::{
        DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
        SessionConfig,
    },
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "{0} not found in environment variables.\n\
         Please create a .env file with your API key or set it in your environment."
    )]
    MissingCredential(String),
}

/// Chat parameters applied to a new session.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChatConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            history_window: default_history_window(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_export_dir() -> String {
    ".".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub model: ModelConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

impl Config {
    #[instrument(skip(self))]
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::Config("model name must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.chat.temperature) {
            return Err(ConfigError::Config(format!(
                "chat.temperature must be between 0 and 1, got {}",
                self.chat.temperature
            )));
        }
        if self.chat.max_tokens == 0 {
            return Err(ConfigError::Config(
                "chat.max_tokens must be positive".into(),
            ));
        }
        if self.chat.history_window == 0 {
            return Err(ConfigError::Config(
                "chat.history_window must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Initial parameters for a chat session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            model: self.model.name.clone(),
            temperature: self.chat.temperature,
            max_tokens: self.chat.max_tokens,
            system_prompt: self.chat.system_prompt.clone(),
            history_window: self.chat.history_window,
        }
    }

    /// Export directory with `~` expanded.
    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export_dir).into_owned())
    }
}

/// Resolve a secret value. `env:NAME` reads the `NAME` environment variable,
/// anything else is returned as is.
pub fn resolve_secret(value: &str) -> Result<String, ConfigError> {
    match value.strip_prefix("env:") {
        Some(var) => {
            let var = var.trim();
            std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingCredential(var.to_string()))
        }
        None => Ok(value.to_string()),
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(|| get_config_dir().join("confab.yml"));

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(DEFAULT_CONFIG.as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let config: Config = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
