//! Database module for machine records.
//!
//! Storage is reached through the [`MachineRepository`] trait so the HTTP layer
//! does not care which backend is configured.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers                                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │                               │
//! ┌───▼──────────────────┐   ┌────────▼─────────┐
//! │  PostgresRepository  │   │  LocalRepository │
//! │  (connection per     │   │  (in-memory)     │
//! │   call, no pooling)  │   │                  │
//! └──────────────────────┘   └──────────────────┘
//! ```
//!
//! - `models`: `Machine`, `NewMachine`, `MachineId`
//! - `config`: connection settings
//! - `connection`: open + ping (Postgres only)
//! - `factory`: builds the configured backend

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
#[cfg(feature = "postgres-repo")]
pub mod connection;
pub mod factory;
pub mod models;
pub mod repositories;
pub mod repository;

pub use config::DatabaseConfig;
pub use factory::{RepositoryFactory, RepositoryType};
pub use models::{Machine, MachineId, NewMachine};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ErrorContext, MachineRepository, RepositoryError, RepositoryResult};
