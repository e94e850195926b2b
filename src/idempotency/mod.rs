//! Duplicate guard
//!
//! Best-effort detection of retried transfer requests so a client retry
//! after a network timeout does not move funds twice.
//!
//! The match is a heuristic carried over from the source system: any ledger
//! record with the same destination account, same value and a same-day
//! creation date counts as a duplicate, regardless of the requisicao id.
//! This both under- and over-matches; the over-match is pinned by tests as
//! documented behavior. The guard is a point-in-time read with no locking,
//! so two concurrent identical requests can race past it.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{LedgerError, TransferLedger, TransferRecord};

pub struct DuplicateGuard {
    ledger: Arc<dyn TransferLedger>,
}

impl DuplicateGuard {
    pub fn new(ledger: Arc<dyn TransferLedger>) -> Self {
        Self { ledger }
    }

    /// Look up a prior transfer matching `{destination, value, today}` among
    /// the source account's records.
    pub async fn find_duplicate(
        &self,
        conta_origem: i64,
        conta_destino: i64,
        valor: Decimal,
        today: NaiveDate,
    ) -> Result<Option<TransferRecord>, LedgerError> {
        let records = self.ledger.get_by_account(conta_origem).await?;

        Ok(records.into_iter().find(|record| {
            record.conta_destino == conta_destino
                && record.valor == valor
                && record.created_at.date_naive() == today
        }))
    }
}
