use crate::database::error::DatabaseError;
use crate::database::repository::PendingTransferStore;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{types::BigDecimal, FromRow, PgPool};

/// Transfer context persisted across the gateway redirect, keyed by the
/// gateway reference carried back on the callback route.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingTransfer {
    pub reference: String,
    pub payer_email: String,
    pub recipient_email: String,
    pub amount: BigDecimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for a pending transfer
#[derive(Debug, Clone)]
pub struct NewPendingTransfer {
    pub reference: String,
    pub payer_email: String,
    pub recipient_email: String,
    pub amount: BigDecimal,
}

/// Repository for pending transfers
pub struct PendingTransferRepository {
    pool: PgPool,
}

impl PendingTransferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PendingTransferStore for PendingTransferRepository {
    async fn put(&self, transfer: NewPendingTransfer) -> Result<PendingTransfer, DatabaseError> {
        sqlx::query_as::<_, PendingTransfer>(
            "INSERT INTO pending_transfers (reference, payer_email, recipient_email, amount)
             VALUES ($1, $2, $3, $4)
             RETURNING reference, payer_email, recipient_email, amount, created_at",
        )
        .bind(&transfer.reference)
        .bind(&transfer.payer_email)
        .bind(&transfer.recipient_email)
        .bind(&transfer.amount)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<PendingTransfer>, DatabaseError> {
        sqlx::query_as::<_, PendingTransfer>(
            "SELECT reference, payer_email, recipient_email, amount, created_at
             FROM pending_transfers
             WHERE reference = $1",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn delete(&self, reference: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM pending_transfers WHERE reference = $1")
            .bind(reference)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
