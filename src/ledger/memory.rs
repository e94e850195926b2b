//! In-memory transfer ledger for tests

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{LedgerError, TransferLedger, TransferRecord, TransferStatus};

pub struct InMemoryLedger {
    records: Mutex<Vec<TransferRecord>>,
    fail_next_add: Mutex<bool>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_next_add: Mutex::new(false),
        }
    }

    /// Seed an existing record, e.g. for duplicate-guard scenarios.
    pub fn seed(&self, record: TransferRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Make the next `add` fail with a database error.
    pub fn fail_next_add(&self) {
        *self.fail_next_add.lock().unwrap() = true;
    }

    pub fn records(&self) -> Vec<TransferRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn record(&self, transfer_id: Uuid) -> Option<TransferRecord> {
        self.records()
            .into_iter()
            .find(|r| r.transfer_id == transfer_id)
    }
}

#[async_trait]
impl TransferLedger for InMemoryLedger {
    async fn add(&self, record: &TransferRecord) -> Result<(), LedgerError> {
        if std::mem::take(&mut *self.fail_next_add.lock().unwrap()) {
            return Err(LedgerError::Database(sqlx::Error::PoolClosed));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn get_by_account(&self, numero_conta: i64) -> Result<Vec<TransferRecord>, LedgerError> {
        let mut records: Vec<TransferRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.conta_origem == numero_conta || r.conta_destino == numero_conta)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn update_status(&self, transfer_id: Uuid, status: TransferStatus) -> Result<(), LedgerError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.transfer_id == transfer_id) {
            Some(record) => {
                record.status = status;
                Ok(())
            }
            None => Err(LedgerError::NotFound(transfer_id)),
        }
    }
}
