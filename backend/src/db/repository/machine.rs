//! Repository trait for machine records.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{Machine, MachineId, NewMachine};

/// Storage operations for the `machines` table.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single instance can be shared by
/// every request handler.
#[async_trait]
pub trait MachineRepository: Send + Sync {
    /// Check if the database is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if a connection could be opened and probed
    /// - `Ok(false)` if the backend reports itself unhealthy
    /// - `Err(RepositoryError)` if opening or probing failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a machine and return the id assigned by the storage layer.
    ///
    /// Failure points surface as distinct variants, in the order they can occur:
    /// `ConnectionError`, `StatementError`, `QueryError`, `GeneratedIdError`.
    async fn insert_machine(&self, machine: &NewMachine) -> RepositoryResult<MachineId>;

    /// List every machine ordered by id.
    async fn list_machines(&self) -> RepositoryResult<Vec<Machine>>;

    /// Fetch one machine.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no machine has this id
    async fn get_machine(&self, id: MachineId) -> RepositoryResult<Machine>;
}
