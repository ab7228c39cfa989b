use crate::database::repository::TransactionStore;
use crate::database::transaction_repository::{NewTransactionRecord, TransactionRecord};
use crate::error::{AppError, DomainError};
use crate::gateway::types::VerifiedPayment;
use std::sync::Arc;
use tracing::{debug, info};

/// Writes verified payments exactly once.
///
/// The callback route can be reached multiple times for one reference (page
/// reload, retried request), so recording is check-then-insert with the
/// store's unique constraint on the gateway transaction id as the backstop:
/// a concurrent insert losing that race is reported as success with the
/// winner's row.
pub struct TransactionRecorder {
    transactions: Arc<dyn TransactionStore>,
}

impl TransactionRecorder {
    pub fn new(transactions: Arc<dyn TransactionStore>) -> Self {
        Self { transactions }
    }

    pub async fn record_if_absent(
        &self,
        payment: &VerifiedPayment,
        recipient_email: &str,
    ) -> Result<TransactionRecord, AppError> {
        let gateway_transaction_id = payment.transaction_id;

        if let Some(existing) = self
            .transactions
            .find_by_gateway_id(gateway_transaction_id)
            .await
            .map_err(|e| Self::recording_error(gateway_transaction_id, e.to_string()))?
        {
            debug!(
                gateway_transaction_id,
                "transaction already recorded, returning existing record"
            );
            return Ok(existing);
        }

        let record = NewTransactionRecord {
            gateway_transaction_id,
            amount: payment.amount.clone(),
            currency: payment.currency.clone(),
            status: payment.status.clone(),
            payer_email: payment.customer_email.clone(),
            payer_external_id: payment.customer_id,
            metadata: serde_json::json!({
                "recipient_email": recipient_email,
                "reference": payment.reference,
                "channel": payment.channel,
                "paid_at": payment.paid_at,
            }),
        };

        match self.transactions.insert(record).await {
            Ok(stored) => {
                info!(
                    gateway_transaction_id,
                    amount = %stored.amount,
                    currency = %stored.currency,
                    "transaction recorded"
                );
                Ok(stored)
            }
            Err(err) if err.is_unique_violation() => {
                // Lost the insert race; the winner's row is authoritative.
                info!(
                    gateway_transaction_id,
                    "concurrent insert won the race, returning existing record"
                );
                self.transactions
                    .find_by_gateway_id(gateway_transaction_id)
                    .await
                    .map_err(|e| Self::recording_error(gateway_transaction_id, e.to_string()))?
                    .ok_or_else(|| {
                        Self::recording_error(
                            gateway_transaction_id,
                            "record vanished after unique violation".to_string(),
                        )
                    })
            }
            Err(err) => Err(Self::recording_error(
                gateway_transaction_id,
                err.to_string(),
            )),
        }
    }

    fn recording_error(gateway_transaction_id: i64, message: String) -> AppError {
        AppError::domain(DomainError::RecordingFailed {
            gateway_transaction_id,
            message,
        })
    }
}
