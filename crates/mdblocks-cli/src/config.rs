//! Optional TOML configuration for the `mdblocks` binary.
//!
//! ```toml
//! [html]
//! paragraph_class = "lead"
//! quote_level_prefix = "depth-"
//! wrap_document = "rich-text"
//!
//! [render]
//! default_format = "markdown"
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use mdblocks_core::HtmlOptions;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at {config_path}")]
    ConfigNotFound { config_path: PathBuf },

    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Output format of the `render` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Html,
    Markdown,
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub default_format: RenderFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub html: HtmlOptions,
    pub render: RenderConfig,
}

impl Config {
    /// Load a config file. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        Ok(Some(config))
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist; the default location is optional and
    /// falls back to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path)?.ok_or_else(|| ConfigError::ConfigNotFound {
                config_path: path.to_path_buf(),
            }),
            None => Ok(Self::load_from_path(Self::config_path())?.unwrap_or_default()),
        }
    }

    /// `$XDG_CONFIG_HOME/mdblocks/config.toml`, else `~/.config/mdblocks/config.toml`.
    pub fn config_path() -> PathBuf {
        let config_dir = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir).join("mdblocks"),
            _ => PathBuf::from(shellexpand::tilde("~/.config/mdblocks").as_ref()),
        };
        config_dir.join("config.toml")
    }
}
