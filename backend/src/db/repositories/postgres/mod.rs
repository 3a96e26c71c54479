//! Postgres repository implementation using Diesel.
//!
//! Each repository call opens its own connection through
//! [`crate::db::connection::open`], runs on the blocking thread pool, and
//! closes the connection before returning.
//!
//! ## Configuration
//!
//! See [`DatabaseConfig`]; `DATABASE_URL` or `PG_DATABASE_URL` override the
//! individual connection fields.
//!
//! The `machines` table is expected to exist (`sql/machines.sql`).

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::{debug, warn};
use tokio::task;

use crate::db::config::DatabaseConfig;
use crate::db::connection;
use crate::db::models::{Machine, MachineId, NewMachine};
use crate::db::repository::{
    ErrorContext, MachineRepository, RepositoryError, RepositoryResult,
};

mod models;
mod schema;

use models::*;
use schema::*;

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    config: DatabaseConfig,
}

impl PostgresRepository {
    /// Create a repository. No connection is opened until the first call.
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Open a connection, run `f` on the blocking pool, and drop the connection.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let config = self.config.clone();

        task::spawn_blocking(move || {
            let mut conn = connection::open(&config).map_err(|e| e.with_operation(operation))?;
            let result = f(&mut conn);
            if let Err(ref e) = result {
                warn!("{} failed: {}", operation, e);
            }
            result
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error, operation: &str) -> RepositoryError {
    RepositoryError::from(err).with_operation(operation)
}

#[async_trait]
impl MachineRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        // `open` already probes the connection
        self.with_conn("health_check", |_conn| Ok(true)).await
    }

    async fn insert_machine(&self, machine: &NewMachine) -> RepositoryResult<MachineId> {
        let machine = machine.clone();
        self.with_conn("insert_machine", move |conn| {
            let row = NewMachineRow::bind(&machine)?;

            let generated: i32 = diesel::insert_into(machines::table)
                .values(&row)
                .returning(machines::id)
                .get_result(conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => RepositoryError::generated_id_with_context(
                        "insert returned no id",
                        ErrorContext::new("insert_machine").with_entity("machine"),
                    ),
                    other => map_diesel_error(other, "insert_machine"),
                })?;

            debug!("Inserted machine row with id {}", generated);
            MachineId::from_generated(i64::from(generated))
        })
        .await
    }

    async fn list_machines(&self) -> RepositoryResult<Vec<Machine>> {
        self.with_conn("list_machines", |conn| {
            machines::table
                .order(machines::id.asc())
                .select(MachineRow::as_select())
                .load::<MachineRow>(conn)
                .map_err(|e| map_diesel_error(e, "list_machines"))?
                .into_iter()
                .map(Machine::try_from)
                .collect()
        })
        .await
    }

    async fn get_machine(&self, id: MachineId) -> RepositoryResult<Machine> {
        let not_found = move || {
            RepositoryError::not_found_with_context(
                format!("Machine {} not found", id),
                ErrorContext::new("get_machine")
                    .with_entity("machine")
                    .with_entity_id(id),
            )
        };

        // SERIAL ids never exceed i32::MAX
        let Ok(key) = i32::try_from(id.value()) else {
            return Err(not_found());
        };

        self.with_conn("get_machine", move |conn| {
            machines::table
                .find(key)
                .select(MachineRow::as_select())
                .first::<MachineRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e, "get_machine"))?
                .ok_or_else(not_found)
                .and_then(Machine::try_from)
        })
        .await
    }
}
