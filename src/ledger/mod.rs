//! Transfer Ledger
//!
//! Append-only persistence of transfer intents, consulted by the duplicate
//! guard and written by the saga. The only permitted mutation is the status
//! transition recording saga progress, kept so operators can find stuck
//! half-reversed transfers.

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgTransferLedger;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Saga progress recorded on a ledger entry.
///
/// `Pending` means the debit succeeded and the credit outcome is not yet
/// known. `ReversalFailed` marks a transfer with money debited and neither
/// credited nor returned; those rows are the ones worth alerting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Completed,
    Reversed,
    ReversalFailed,
}

impl From<String> for TransferStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => TransferStatus::Pending,
            "COMPLETED" => TransferStatus::Completed,
            "REVERSED" => TransferStatus::Reversed,
            "REVERSAL_FAILED" => TransferStatus::ReversalFailed,
            _ => TransferStatus::Pending,
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferStatus::Pending => write!(f, "PENDING"),
            TransferStatus::Completed => write!(f, "COMPLETED"),
            TransferStatus::Reversed => write!(f, "REVERSED"),
            TransferStatus::ReversalFailed => write!(f, "REVERSAL_FAILED"),
        }
    }
}

/// One accepted transfer intent. `transfer_id` is generated server-side and
/// independent of the caller's requisicao id.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    pub transfer_id: Uuid,
    pub conta_origem: i64,
    pub conta_destino: i64,
    pub valor: Decimal,
    pub descricao: Option<String>,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// New pending record with a fresh transfer id.
    pub fn new(conta_origem: i64, conta_destino: i64, valor: Decimal, descricao: Option<String>) -> Self {
        Self {
            transfer_id: Uuid::new_v4(),
            conta_origem,
            conta_destino,
            valor,
            descricao,
            status: TransferStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Ledger errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transfer not found: {0}")]
    NotFound(Uuid),
}

/// Storage seam for transfer records.
#[async_trait]
pub trait TransferLedger: Send + Sync {
    /// Append a transfer intent.
    async fn add(&self, record: &TransferRecord) -> Result<(), LedgerError>;

    /// Records where the account is source or destination, most recent first.
    async fn get_by_account(&self, numero_conta: i64) -> Result<Vec<TransferRecord>, LedgerError>;

    /// Record saga progress on an existing entry.
    async fn update_status(&self, transfer_id: Uuid, status: TransferStatus) -> Result<(), LedgerError>;
}
