//! HTTP error handling and response types.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::db::repository::RepositoryError;
use crate::templates::TemplateError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for the JSON handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { message, .. } => {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
                }
                RepositoryError::ConnectionError { .. } => {
                    error!("Repository unavailable: {}", e);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ApiError::new("DATABASE_UNAVAILABLE", "Erro ao conectar ao banco de dados"),
                    )
                }
                other => {
                    error!("Repository error: {}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("REPOSITORY_ERROR", other.to_string()),
                    )
                }
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

/// Failure points of `POST /createMachine`, in the order they can occur.
///
/// The response body is a fixed plain-text message per variant; the
/// underlying error only goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum CreateMachineError {
    #[error("failed to read request body: {0}")]
    ReadBody(#[source] BytesRejection),

    #[error("failed to decode machine payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to connect to the database: {0}")]
    Connection(#[source] RepositoryError),

    #[error("failed to prepare insert statement: {0}")]
    Statement(#[source] RepositoryError),

    #[error("failed to execute insert: {0}")]
    Execute(#[source] RepositoryError),

    #[error("failed to read generated id: {0}")]
    GeneratedId(#[source] RepositoryError),
}

impl CreateMachineError {
    /// Plain-text body sent to the client.
    pub fn message(&self) -> &'static str {
        match self {
            Self::ReadBody(_) => "Falha ao ler corpo da requisição",
            Self::Decode(_) => "Erro ao converter o dado para struct",
            Self::Connection(_) => "Erro ao conectar ao banco de dados",
            Self::Statement(_) => "Erro ao criar statement!",
            Self::Execute(_) => "Erro ao inserir os dados no banco!",
            Self::GeneratedId(_) => "Erro ao obter o ID Inserido",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ReadBody(_) | Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Statement(_) | Self::Execute(_) | Self::GeneratedId(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RepositoryError> for CreateMachineError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConnectionError { .. } => Self::Connection(err),
            RepositoryError::StatementError { .. } => Self::Statement(err),
            RepositoryError::GeneratedIdError { .. } => Self::GeneratedId(err),
            _ => Self::Execute(err),
        }
    }
}

impl IntoResponse for CreateMachineError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Create machine failed: {}", self);
        } else {
            warn!("Create machine rejected: {}", self);
        }
        (status, self.message()).into_response()
    }
}

impl IntoResponse for TemplateError {
    fn into_response(self) -> Response {
        error!("Template render failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
