//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::MachineRepository;
use crate::templates::Templates;

/// Default cap on request bodies (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn MachineRepository>,
    /// HTML pages loaded at startup
    pub templates: Templates,
    /// Maximum accepted request body size in bytes
    pub body_limit: usize,
}

impl AppState {
    pub fn new(repository: Arc<dyn MachineRepository>, templates: Templates) -> Self {
        Self {
            repository,
            templates,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }
}
