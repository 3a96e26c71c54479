//! HTTP handlers for the web backend.
//!
//! Page handlers serve HTML from the template store; the create handler
//! decodes a JSON machine and inserts it through the repository.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::{debug, info, warn};

use super::dto::{HealthResponse, Machine, MachineListResponse, NewMachine};
use super::error::{AppError, CreateMachineError};
use super::state::AppState;
use crate::db::models::MachineId;
use crate::templates::{self, TemplateError};

/// Result type for JSON handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for page handlers.
pub type PageResult = Result<Html<String>, TemplateError>;

// =============================================================================
// Pages
// =============================================================================

/// GET /home
pub async fn home(State(state): State<AppState>) -> PageResult {
    state.templates.render(templates::INDEX).map(Html)
}

/// GET /CreateMachine
pub async fn create_machine_page(State(state): State<AppState>) -> PageResult {
    state.templates.render(templates::CREATE_MACHINE).map(Html)
}

/// PUT /UpdateMachine
///
/// Serves the update page only; no record is modified.
pub async fn update_machine_page(State(state): State<AppState>) -> PageResult {
    state.templates.render(templates::UPDATE_MACHINE).map(Html)
}

// =============================================================================
// Machine CRUD
// =============================================================================

/// POST /createMachine (also POST /CreateMachine)
///
/// Body: `{name, brand, description, serial_number, installation_location}`.
/// Responds `201` with the generated id, or a plain-text error message.
pub async fn create_machine(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, String), CreateMachineError> {
    info!("Creating the machine...");

    let body = body.map_err(CreateMachineError::ReadBody)?;
    let machine = NewMachine::from_json_slice(&body).map_err(CreateMachineError::Decode)?;
    debug!(?machine, "Decoded machine payload");

    let id = state.repository.insert_machine(&machine).await?;

    info!(
        machine_id = %id,
        name = %machine.name,
        brand = %machine.brand,
        "Machine created"
    );
    Ok((
        StatusCode::CREATED,
        format!("Usuário inserido com sucesso! ID: {}", id),
    ))
}

/// GET /machines
pub async fn list_machines(State(state): State<AppState>) -> HandlerResult<MachineListResponse> {
    let machines = state.repository.list_machines().await?;
    let total = machines.len();

    Ok(Json(MachineListResponse { machines, total }))
}

/// GET /machines/{id}
pub async fn get_machine(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> HandlerResult<Machine> {
    let Path(id) = id.map_err(|e| AppError::BadRequest(format!("Invalid machine id: {}", e)))?;
    let machine = state.repository.get_machine(MachineId::new(id)).await?;

    Ok(Json(machine))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether the database can be reached. Always answers `200`.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            warn!("Health check failed: {}", e);
            "error".to_string()
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}
