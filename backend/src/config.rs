//! Application configuration.
//!
//! Values are resolved in three layers: built-in defaults, an optional TOML
//! file, then environment variable overrides.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! templates_dir = "static/html"
//!
//! [repository]
//! type = "postgres"
//!
//! [database]
//! user = "admIndustrial"
//! password = "sysIndustrial"
//! host = "localhost"
//! name = "industrial"
//! ```
//!
//! # Environment Variables
//!
//! - `MACHINES_CONFIG`: Path to the TOML file (default: `machines.toml` if present)
//! - `HOST`, `PORT`: Bind address
//! - `TEMPLATES_DIR`: Directory holding the HTML pages
//! - `REPOSITORY_TYPE`: `postgres` | `local`
//! - `DATABASE_URL` / `PG_DATABASE_URL`: Full connection URL

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::db::{DatabaseConfig, RepositoryType};

/// File looked up in the working directory when `MACHINES_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "machines.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub repository: RepositorySettings,
    pub database: DatabaseConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory holding the HTML pages
    pub templates_dir: PathBuf,
    /// Maximum accepted request body size in bytes
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            templates_dir: PathBuf::from("static/html"),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "server.host".to_string(),
                message: e.to_string(),
            })
    }
}

/// Repository type settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: RepositoryType,
}

impl AppConfig {
    /// Load configuration from a TOML file, without environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the full configuration: defaults, then the config file, then
    /// environment overrides.
    ///
    /// A missing `machines.toml` is not an error; a missing file named by
    /// `MACHINES_CONFIG` is.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("MACHINES_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT".to_string(),
                message: format!("'{}' is not a valid port number", port),
            })?;
        }
        if let Ok(dir) = env::var("TEMPLATES_DIR") {
            self.server.templates_dir = PathBuf::from(dir);
        }
        if let Ok(repo_type) = env::var("REPOSITORY_TYPE") {
            self.repository.repo_type =
                repo_type
                    .parse()
                    .map_err(|message| ConfigError::Invalid {
                        key: "REPOSITORY_TYPE".to_string(),
                        message,
                    })?;
        }
        self.database.apply_env();
        Ok(())
    }
}
