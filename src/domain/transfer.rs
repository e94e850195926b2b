//! Transfer command and outcome types
//!
//! A `TransferCommand` is the caller's intent to move funds between two
//! accounts on the remote account service. A `TransferOutcome` is the single
//! terminal result the saga reports back; intermediate states are never
//! exposed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error codes surfaced to callers.
///
/// Local codes are produced before any remote call. Codes originating from a
/// remote movement leg are passed through verbatim, so this list is not
/// exhaustive for remote failures.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const MISSING_REQUEST_ID: &str = "MISSING_REQUEST_ID";
    pub const INVALID_ACCOUNT: &str = "INVALID_ACCOUNT";
    pub const SAME_ACCOUNT: &str = "SAME_ACCOUNT";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
    pub const VALUE_LIMIT_EXCEEDED: &str = "VALUE_LIMIT_EXCEEDED";
    pub const INVALID_DESCRIPTION: &str = "INVALID_DESCRIPTION";
    pub const MISSING_TOKEN: &str = "MISSING_TOKEN";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";
    pub const API_ERROR: &str = "API_ERROR";
    pub const MOVEMENT_ERROR: &str = "MOVEMENT_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Command to transfer funds between two accounts.
///
/// `requisicao_id` is the caller-chosen idempotency key identifying one
/// logical transfer attempt; per-leg operation ids are derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    pub requisicao_id: String,
    pub conta_origem: i64,
    pub conta_destino: i64,
    pub valor: Decimal,
    pub descricao: Option<String>,
}

impl TransferCommand {
    pub fn new(requisicao_id: impl Into<String>, conta_origem: i64, conta_destino: i64, valor: Decimal) -> Self {
        Self {
            requisicao_id: requisicao_id.into(),
            conta_origem,
            conta_destino,
            valor,
            descricao: None,
        }
    }

    pub fn with_descricao(mut self, descricao: impl Into<String>) -> Self {
        self.descricao = Some(descricao.into());
        self
    }
}

/// Terminal result of a transfer saga. Outcomes are binary: the caller never
/// sees a partially-succeeded transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Completed {
        transfer_id: Uuid,
        valor: Decimal,
        processed_at: DateTime<Utc>,
    },
    Failed {
        mensagem: String,
        tipo: String,
    },
}

impl TransferOutcome {
    pub fn completed(transfer_id: Uuid, valor: Decimal, processed_at: DateTime<Utc>) -> Self {
        Self::Completed {
            transfer_id,
            valor,
            processed_at,
        }
    }

    pub fn failed(mensagem: impl Into<String>, tipo: impl Into<String>) -> Self {
        Self::Failed {
            mensagem: mensagem.into(),
            tipo: tipo.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Error code of a failed outcome.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Failed { tipo, .. } => Some(tipo),
            Self::Completed { .. } => None,
        }
    }

    /// Generated transfer id of a successful outcome.
    pub fn transfer_id(&self) -> Option<Uuid> {
        match self {
            Self::Completed { transfer_id, .. } => Some(*transfer_id),
            Self::Failed { .. } => None,
        }
    }
}
