//! In-memory local repository implementation.
//!
//! Stores machines in a `BTreeMap` behind a lock, which makes it suitable for
//! unit tests and local development without a database server. Ids are handed
//! out by a counter, mirroring an auto-increment column.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::models::{Machine, MachineId, NewMachine};
use crate::db::repository::{
    ErrorContext, MachineRepository, RepositoryError, RepositoryResult,
};

/// In-memory local repository.
///
/// # Example
/// ```
/// use machines_backend::db::models::NewMachine;
/// use machines_backend::db::repositories::LocalRepository;
/// use machines_backend::db::repository::MachineRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// let id = repo.insert_machine(&NewMachine::default()).await.unwrap();
/// assert_eq!(id.value(), 1);
/// assert_eq!(repo.len(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    machines: BTreeMap<MachineId, Machine>,
    next_id: u32,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            machines: BTreeMap::new(),
            next_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Number of stored machines.
    pub fn len(&self) -> usize {
        self.data.read().machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Simulate the database going away (or coming back).
    ///
    /// While unhealthy every operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Remove every machine and reset the id counter.
    pub fn clear(&self) {
        *self.data.write() = LocalData::default();
    }

    fn ensure_connected(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "local repository is marked unavailable",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MachineRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn insert_machine(&self, machine: &NewMachine) -> RepositoryResult<MachineId> {
        let mut data = self.data.write();
        Self::ensure_connected(&data, "insert_machine")?;

        // Same bind rule as the BIGINT column
        machine.stored_serial_number()?;

        let id = MachineId::from_generated(i64::from(data.next_id))?;
        data.next_id = data.next_id.checked_add(1).ok_or_else(|| {
            RepositoryError::internal_with_context(
                "id counter exhausted",
                ErrorContext::new("insert_machine").with_entity("machine"),
            )
        })?;
        data.machines.insert(id, machine.clone().into_machine(id));

        Ok(id)
    }

    async fn list_machines(&self) -> RepositoryResult<Vec<Machine>> {
        let data = self.data.read();
        Self::ensure_connected(&data, "list_machines")?;
        Ok(data.machines.values().cloned().collect())
    }

    async fn get_machine(&self, id: MachineId) -> RepositoryResult<Machine> {
        let data = self.data.read();
        Self::ensure_connected(&data, "get_machine")?;
        data.machines.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Machine {} not found", id),
                ErrorContext::new("get_machine")
                    .with_entity("machine")
                    .with_entity_id(id),
            )
        })
    }
}
