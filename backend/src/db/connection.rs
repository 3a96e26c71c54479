//! Connection provider for the Postgres backend.
//!
//! Every call opens a fresh connection and probes it before handing it out.
//! There is no pooling: the connection is closed when the returned value is
//! dropped.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use log::debug;

use super::config::DatabaseConfig;
use super::repository::{ErrorContext, RepositoryError, RepositoryResult};

/// Open a connection and verify it with a liveness probe.
///
/// # Errors
/// * `RepositoryError::ConnectionError` if the URL is malformed, the server is
///   unreachable, authentication fails, or the probe fails.
pub fn open(config: &DatabaseConfig) -> RepositoryResult<PgConnection> {
    debug!("Opening database connection to {}", config.redacted_url());

    let mut conn = PgConnection::establish(&config.connection_url()).map_err(|e| {
        RepositoryError::connection_with_context(
            e.to_string(),
            ErrorContext::new("establish")
                .with_details(format!("host={} database={}", config.host, config.name)),
        )
    })?;

    ping(&mut conn)?;
    Ok(conn)
}

/// Run `SELECT 1` on an open connection.
pub fn ping(conn: &mut PgConnection) -> RepositoryResult<()> {
    sql_query("SELECT 1")
        .execute(conn)
        .map(|_| ())
        .map_err(|e| RepositoryError::connection_with_context(e.to_string(), ErrorContext::new("ping")))
}
