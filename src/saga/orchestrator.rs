//! Transfer Saga Orchestrator
//!
//! Drives one transfer through its state machine, strictly in sequence:
//! validate, duplicate check, token check, debit, record intent, credit and,
//! when the credit fails after a successful debit, exactly one compensating
//! reversal. The caller receives a single terminal outcome; a failed or even
//! failed-to-compensate transfer is still reported with the original credit
//! error code.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{codes, TransferCommand, TransferOutcome};
use crate::gateway::{MovementGateway, MovementRequest, MovementResult};
use crate::idempotency::DuplicateGuard;
use crate::ledger::{LedgerError, TransferLedger, TransferRecord, TransferStatus};

use super::validator;

pub struct TransferSaga {
    gateway: Arc<dyn MovementGateway>,
    ledger: Arc<dyn TransferLedger>,
    guard: DuplicateGuard,
}

impl TransferSaga {
    pub fn new(gateway: Arc<dyn MovementGateway>, ledger: Arc<dyn TransferLedger>) -> Self {
        let guard = DuplicateGuard::new(ledger.clone());
        Self {
            gateway,
            ledger,
            guard,
        }
    }

    /// Execute one transfer. Never panics and never returns an `Err`: any
    /// unexpected failure collapses into a terminal `INTERNAL_ERROR` outcome
    /// with no partial state exposed.
    pub async fn execute(&self, command: &TransferCommand, token: Option<&str>) -> TransferOutcome {
        match self.run(command, token).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    requisicao_id = %command.requisicao_id,
                    error = %e,
                    "unexpected error during transfer"
                );
                TransferOutcome::failed("internal error during transfer", codes::INTERNAL_ERROR)
            }
        }
    }

    async fn run(
        &self,
        command: &TransferCommand,
        token: Option<&str>,
    ) -> Result<TransferOutcome, LedgerError> {
        tracing::info!(requisicao_id = %command.requisicao_id, "processing transfer");

        // Step 1: validation. Terminal on failure, nothing touched yet.
        if let Err(failure) = validator::validate(command) {
            tracing::warn!(
                requisicao_id = %command.requisicao_id,
                code = failure.code,
                "transfer rejected by validation"
            );
            return Ok(TransferOutcome::failed(failure.message, failure.code));
        }

        // Step 2: duplicate check. A hit short-circuits with the existing
        // transfer id but a fresh timestamp, not the original one.
        if let Some(existing) = self
            .guard
            .find_duplicate(
                command.conta_origem,
                command.conta_destino,
                command.valor,
                Utc::now().date_naive(),
            )
            .await?
        {
            tracing::info!(
                requisicao_id = %command.requisicao_id,
                transfer_id = %existing.transfer_id,
                "duplicate transfer detected, returning existing record"
            );
            return Ok(TransferOutcome::completed(
                existing.transfer_id,
                command.valor,
                Utc::now(),
            ));
        }

        // Step 3: the caller's bearer token is forwarded to both legs; the
        // saga has no service identity of its own.
        let token = match token {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                tracing::error!(requisicao_id = %command.requisicao_id, "bearer token not found");
                return Ok(TransferOutcome::failed(
                    "bearer token not found on request",
                    codes::MISSING_TOKEN,
                ));
            }
        };

        // Step 4: debit leg. Terminal on failure, nothing to compensate.
        let debit = self
            .gateway
            .execute(
                token,
                &MovementRequest::debit(&command.requisicao_id, command.conta_origem, command.valor),
            )
            .await;
        if !debit.is_success {
            tracing::error!(
                requisicao_id = %command.requisicao_id,
                error = debit.error.as_deref().unwrap_or(""),
                "debit leg failed"
            );
            return Ok(Self::leg_failure(debit));
        }

        // Step 5: record the intent only after the debit succeeded, so a
        // failed debit leaves no ledger trace.
        let record = TransferRecord::new(
            command.conta_origem,
            command.conta_destino,
            command.valor,
            command.descricao.clone(),
        );
        let transfer_id = record.transfer_id;
        self.ledger.add(&record).await?;
        tracing::info!(
            requisicao_id = %command.requisicao_id,
            transfer_id = %transfer_id,
            "transfer recorded"
        );

        // Step 6: credit leg.
        let credit = self
            .gateway
            .execute(
                token,
                &MovementRequest::credit(&command.requisicao_id, command.conta_destino, command.valor),
            )
            .await;
        if credit.is_success {
            self.record_status(transfer_id, TransferStatus::Completed).await;
            tracing::info!(
                requisicao_id = %command.requisicao_id,
                transfer_id = %transfer_id,
                "transfer completed"
            );
            return Ok(TransferOutcome::completed(transfer_id, command.valor, Utc::now()));
        }

        // Step 7: compensation. One reversing credit back to the source
        // account. Its outcome is recorded and logged but the caller always
        // sees the original credit failure.
        tracing::error!(
            requisicao_id = %command.requisicao_id,
            error = credit.error.as_deref().unwrap_or(""),
            "credit leg failed, starting reversal"
        );
        let reversal = self
            .gateway
            .execute(
                token,
                &MovementRequest::reversal(&command.requisicao_id, command.conta_origem, command.valor),
            )
            .await;
        let status = if reversal.is_success {
            tracing::info!(requisicao_id = %command.requisicao_id, "reversal completed");
            TransferStatus::Reversed
        } else {
            tracing::error!(
                requisicao_id = %command.requisicao_id,
                error = reversal.error.as_deref().unwrap_or(""),
                "reversal failed, funds remain debited"
            );
            TransferStatus::ReversalFailed
        };
        self.record_status(transfer_id, status).await;

        Ok(Self::leg_failure(credit))
    }

    /// Status updates are observability only and never change the outcome
    /// already decided by the legs.
    async fn record_status(&self, transfer_id: uuid::Uuid, status: TransferStatus) {
        if let Err(e) = self.ledger.update_status(transfer_id, status).await {
            tracing::error!(
                transfer_id = %transfer_id,
                status = %status,
                error = %e,
                "failed to record transfer status"
            );
        }
    }

    fn leg_failure(result: MovementResult) -> TransferOutcome {
        TransferOutcome::failed(
            result
                .error
                .unwrap_or_else(|| "movement rejected by the account API".to_string()),
            result
                .error_code
                .unwrap_or_else(|| codes::MOVEMENT_ERROR.to_string()),
        )
    }
}
