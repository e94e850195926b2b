//! Postgres-backed transfer ledger

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{LedgerError, TransferLedger, TransferRecord, TransferStatus};

/// Ledger over the `transfers` table.
#[derive(Debug, Clone)]
pub struct PgTransferLedger {
    pool: PgPool,
}

impl PgTransferLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type TransferRow = (
    Uuid,
    i64,
    i64,
    Decimal,
    Option<String>,
    String,
    DateTime<Utc>,
);

fn row_to_record(
    (transfer_id, conta_origem, conta_destino, valor, descricao, status, created_at): TransferRow,
) -> TransferRecord {
    TransferRecord {
        transfer_id,
        conta_origem,
        conta_destino,
        valor,
        descricao,
        status: TransferStatus::from(status),
        created_at,
    }
}

#[async_trait]
impl TransferLedger for PgTransferLedger {
    async fn add(&self, record: &TransferRecord) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO transfers (id, conta_origem, conta_destino, valor, descricao, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.transfer_id)
        .bind(record.conta_origem)
        .bind(record.conta_destino)
        .bind(record.valor)
        .bind(&record.descricao)
        .bind(record.status.to_string())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_account(&self, numero_conta: i64) -> Result<Vec<TransferRecord>, LedgerError> {
        let rows: Vec<TransferRow> = sqlx::query_as(
            r#"
            SELECT id, conta_origem, conta_destino, valor, descricao, status, created_at
            FROM transfers
            WHERE conta_origem = $1 OR conta_destino = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(numero_conta)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn update_status(&self, transfer_id: Uuid, status: TransferStatus) -> Result<(), LedgerError> {
        let rows = sqlx::query(
            r#"
            UPDATE transfers
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(transfer_id)
        .bind(status.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(LedgerError::NotFound(transfer_id));
        }

        Ok(())
    }
}
