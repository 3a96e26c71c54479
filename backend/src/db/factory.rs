//! Repository factory for dependency injection.
//!
//! Picks the storage backend from configuration and hands out a shared
//! `Arc<dyn MachineRepository>`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use super::config::DatabaseConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{MachineRepository, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("postgres", "pg", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl TryFrom<String> for RepositoryType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepositoryType> for String {
    fn from(value: RepositoryType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl Default for RepositoryType {
    /// Postgres when the backend is compiled in, otherwise the in-memory store.
    fn default() -> Self {
        if cfg!(feature = "postgres-repo") {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Errors
    /// * `RepositoryError::ConfigurationError` if Postgres is requested but the
    ///   `postgres-repo` feature is not compiled in.
    pub fn create(
        repo_type: RepositoryType,
        database: &DatabaseConfig,
    ) -> RepositoryResult<Arc<dyn MachineRepository>> {
        info!("Creating {} repository", repo_type);
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    info!("Database: {}", database.redacted_url());
                    Ok(Self::create_postgres(database) as Arc<dyn MachineRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = database;
                    Err(super::repository::RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a Postgres repository.
    #[cfg(feature = "postgres-repo")]
    pub fn create_postgres(database: &DatabaseConfig) -> Arc<PostgresRepository> {
        Arc::new(PostgresRepository::new(database.clone()))
    }

    /// Create an in-memory repository.
    pub fn create_local() -> Arc<dyn MachineRepository> {
        Arc::new(LocalRepository::new())
    }
}
