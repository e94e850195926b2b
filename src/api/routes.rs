//! API Routes
//!
//! HTTP endpoint definitions and the outcome-to-wire mapping.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{codes, TransferCommand, TransferOutcome};
use crate::error::{AppError, ErrorResponse};
use crate::ledger::TransferLedger;
use crate::saga::TransferSaga;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub saga: Arc<TransferSaga>,
    pub ledger: Arc<dyn TransferLedger>,
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferApiRequest {
    pub requisicao_id: String,
    pub conta_origem: i64,
    pub conta_destino: i64,
    pub valor: Decimal,
    #[serde(default)]
    pub descricao: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSuccessResponse {
    pub transfer_id: Uuid,
    pub valor: String,
    pub data_processamento: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferListEntry {
    pub transfer_id: Uuid,
    pub conta_origem: i64,
    pub conta_destino: i64,
    pub valor: Decimal,
    pub descricao: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
}

// =========================================================================
// Router
// =========================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/banking/transfer", post(transfer))
        .route("/api/banking/transfer/conta/:numero", get(transfers_by_account))
        .with_state(state)
}

// =========================================================================
// Handlers
// =========================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "banking_transfer",
        timestamp: Utc::now(),
    })
}

/// Execute a transfer between two accounts.
async fn transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TransferApiRequest>,
) -> Response {
    let token = bearer_token(&headers);

    let mut command = TransferCommand::new(
        request.requisicao_id,
        request.conta_origem,
        request.conta_destino,
        request.valor,
    );
    command.descricao = request.descricao;

    let outcome = state.saga.execute(&command, token.as_deref()).await;

    match outcome {
        TransferOutcome::Completed {
            transfer_id,
            valor,
            processed_at,
        } => (
            StatusCode::OK,
            Json(TransferSuccessResponse {
                transfer_id,
                valor: format!("{valor:.2}"),
                data_processamento: processed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                status: "CONCLUIDA".to_string(),
            }),
        )
            .into_response(),
        TransferOutcome::Failed { mensagem, tipo } => {
            let status = status_for_code(&tipo);
            (status, Json(ErrorResponse { mensagem, tipo })).into_response()
        }
    }
}

/// List an account's transfer records, most recent first.
async fn transfers_by_account(
    State(state): State<AppState>,
    Path(numero): Path<i64>,
) -> Result<Json<Vec<TransferListEntry>>, AppError> {
    let records = state.ledger.get_by_account(numero).await?;

    Ok(Json(
        records
            .into_iter()
            .map(|record| TransferListEntry {
                transfer_id: record.transfer_id,
                conta_origem: record.conta_origem,
                conta_destino: record.conta_destino,
                valor: record.valor,
                descricao: record.descricao,
                status: record.status.to_string(),
                created_at: record.created_at,
            })
            .collect(),
    ))
}

// =========================================================================
// Helpers
// =========================================================================

/// Extract the bearer token from the Authorization header. The token is
/// forwarded to the account API as-is; this service never validates it.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// HTTP status per error code branch. Remote business codes the service does
/// not know about (e.g. INSUFFICIENT_BALANCE) map to 400 like local
/// validation, matching the upstream controller behavior.
fn status_for_code(tipo: &str) -> StatusCode {
    match tipo {
        codes::MISSING_TOKEN => StatusCode::UNAUTHORIZED,
        codes::NETWORK_ERROR | codes::TIMEOUT_ERROR | codes::API_ERROR => StatusCode::BAD_GATEWAY,
        codes::INTERNAL_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}
