//! Error handling module
//!
//! Infrastructure-level errors and their HTTP conversion. Saga failures are
//! not errors at this level: the orchestrator always returns a terminal
//! `TransferOutcome`, and the routes map it to the wire shape directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::codes;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] crate::ledger::LedgerError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body shared with the transfer failure wire shape.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub mensagem: String,
    pub tipo: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, tipo, mensagem) = match &self {
            AppError::Ledger(e) => {
                tracing::error!("Ledger error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    codes::INTERNAL_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    codes::INTERNAL_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            mensagem,
            tipo: tipo.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
