//! Store seams between the services and the external relational store.
//!
//! The Postgres repositories implement these traits; tests substitute
//! in-memory implementations.

use crate::database::error::DatabaseError;
use crate::database::pending_transfer_repository::{NewPendingTransfer, PendingTransfer};
use crate::database::profile_repository::BankProfile;
use crate::database::transaction_repository::{NewTransactionRecord, TransactionRecord};
use async_trait::async_trait;

/// Lookup and creation of recipient/payer banking identities.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Exactly zero or one profile per email.
    async fn find_by_email(&self, email: &str) -> Result<Option<BankProfile>, DatabaseError>;

    async fn insert(&self, email: &str, full_name: &str) -> Result<BankProfile, DatabaseError>;
}

/// Durable record of verified payments, unique per gateway transaction id.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_gateway_id(
        &self,
        gateway_transaction_id: i64,
    ) -> Result<Option<TransactionRecord>, DatabaseError>;

    async fn insert(
        &self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, DatabaseError>;

    async fn list_by_payer(
        &self,
        payer_email: &str,
    ) -> Result<Vec<TransactionRecord>, DatabaseError>;
}

/// Transfer context held between payment initiation and the gateway callback,
/// keyed by the gateway reference.
#[async_trait]
pub trait PendingTransferStore: Send + Sync {
    async fn put(&self, transfer: NewPendingTransfer) -> Result<PendingTransfer, DatabaseError>;

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<PendingTransfer>, DatabaseError>;

    /// Returns true when a row was deleted.
    async fn delete(&self, reference: &str) -> Result<bool, DatabaseError>;
}
