//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

pub use crate::db::models::{Machine, NewMachine};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `connected`, `disconnected` or `error`
    pub database: String,
}

/// Response for `GET /machines`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineListResponse {
    pub machines: Vec<Machine>,
    pub total: usize,
}
