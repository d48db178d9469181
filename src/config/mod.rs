//! Configuration management for `tasklist_rust`.
//!
//! Values are layered, later sources winning:
//! - Built-in defaults
//! - YAML file (`--config`, else `./tasklist.yaml` when present)
//! - Environment variables (`TASKLIST_DATA_FILE`, `TASKLIST_HOST`, `TASKLIST_PORT`)
//! - CLI overrides

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tasklist.yaml";

pub const DEFAULT_DATA_FILE: &str = "tasks.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;

pub const ENV_DATA_FILE: &str = "TASKLIST_DATA_FILE";
pub const ENV_HOST: &str = "TASKLIST_HOST";
pub const ENV_PORT: &str = "TASKLIST_PORT";

/// Template written by `tl init`.
pub const CONFIG_TEMPLATE: &str = r"# Task list configuration
# Shared task file for every signed-in user (relative to this file)
data_file: tasks.json

server:
  host: 127.0.0.1
  port: 8501
";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_file: PathBuf,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            server: ServerConfig::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Load configuration from file, environment and CLI overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, or an
/// environment override is invalid.
pub fn load(explicit: Option<&Path>, overrides: &CliOverrides) -> Result<Config, ConfigError> {
    load_with_env(explicit, overrides, |var| std::env::var(var).ok())
}

/// Same as [`load`] with a custom environment lookup.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env(
    explicit: Option<&Path>,
    overrides: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = match explicit {
        Some(path) => read_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                read_file(default_path)?
            } else {
                Config::default()
            }
        }
    };

    apply_env(&mut config, env)?;
    apply_overrides(&mut config, overrides);

    debug!(?config, "configuration resolved");
    Ok(config)
}

/// Read a YAML config file. A relative `data_file` is taken relative to the
/// file's directory.
///
/// # Errors
///
/// Returns `Read` or `Parse` on failure.
pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = if raw.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str::<Config>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };

    if config.data_file.is_relative() {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            config.data_file = dir.join(&config.data_file);
        }
    }

    Ok(config)
}

fn apply_env(config: &mut Config, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
    if let Some(path) = env(ENV_DATA_FILE).filter(|v| !v.trim().is_empty()) {
        config.data_file = PathBuf::from(path);
    }
    if let Some(host) = env(ENV_HOST).filter(|v| !v.trim().is_empty()) {
        config.server.host = host;
    }
    if let Some(port) = env(ENV_PORT).filter(|v| !v.trim().is_empty()) {
        config.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: ENV_PORT,
            value: port,
        })?;
    }
    Ok(())
}

fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(ref path) = overrides.data_file {
        config.data_file.clone_from(path);
    }
    if let Some(ref host) = overrides.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
}
