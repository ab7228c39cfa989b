#![allow(dead_code)]

//! In-memory store and gateway doubles shared by the integration tests.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use demobank_backend::database::error::DatabaseError;
use demobank_backend::database::pending_transfer_repository::{
    NewPendingTransfer, PendingTransfer,
};
use demobank_backend::database::profile_repository::BankProfile;
use demobank_backend::database::repository::{
    PendingTransferStore, ProfileStore, TransactionStore,
};
use demobank_backend::database::transaction_repository::{
    NewTransactionRecord, TransactionRecord,
};
use demobank_backend::gateway::error::{GatewayError, GatewayResult};
use demobank_backend::gateway::types::{to_minor_units, InitiatedPayment, VerifiedPayment};
use demobank_backend::gateway::PaymentGateway;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, BankProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_profiles(emails: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut profiles = store.profiles.lock().unwrap();
            for email in emails {
                profiles.insert(
                    email.to_string(),
                    BankProfile {
                        id: Uuid::new_v4(),
                        email: email.to_string(),
                        full_name: "Test Account".to_string(),
                        created_at: Utc::now(),
                    },
                );
            }
        }
        store
    }

    pub fn remove(&self, email: &str) {
        self.profiles.lock().unwrap().remove(email);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<BankProfile>, DatabaseError> {
        Ok(self.profiles.lock().unwrap().get(email).cloned())
    }

    async fn insert(&self, email: &str, full_name: &str) -> Result<BankProfile, DatabaseError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(email) {
            return Err(DatabaseError::UniqueViolation {
                constraint: "bank_profiles_email_key".to_string(),
            });
        }
        let profile = BankProfile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            created_at: Utc::now(),
        };
        profiles.insert(email.to_string(), profile.clone());
        Ok(profile)
    }
}

pub struct InMemoryTransactionStore {
    records: Mutex<HashMap<i64, TransactionRecord>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find_by_gateway_id(
        &self,
        gateway_transaction_id: i64,
    ) -> Result<Option<TransactionRecord>, DatabaseError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&gateway_transaction_id)
            .cloned())
    }

    async fn insert(
        &self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, DatabaseError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.gateway_transaction_id) {
            return Err(DatabaseError::UniqueViolation {
                constraint: "transactions_gateway_transaction_id_key".to_string(),
            });
        }
        let stored = TransactionRecord {
            id: Uuid::new_v4(),
            gateway_transaction_id: record.gateway_transaction_id,
            amount: record.amount,
            currency: record.currency,
            status: record.status,
            payer_email: record.payer_email,
            payer_external_id: record.payer_external_id,
            metadata: record.metadata,
            created_at: Utc::now(),
        };
        records.insert(stored.gateway_transaction_id, stored.clone());
        Ok(stored)
    }

    async fn list_by_payer(
        &self,
        payer_email: &str,
    ) -> Result<Vec<TransactionRecord>, DatabaseError> {
        let mut matching: Vec<TransactionRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|record| record.payer_email == payer_email)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}

pub struct InMemoryPendingTransferStore {
    transfers: Mutex<HashMap<String, PendingTransfer>>,
}

impl InMemoryPendingTransferStore {
    pub fn new() -> Self {
        Self {
            transfers: Mutex::new(HashMap::new()),
        }
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.transfers.lock().unwrap().contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.transfers.lock().unwrap().len()
    }
}

#[async_trait]
impl PendingTransferStore for InMemoryPendingTransferStore {
    async fn put(&self, transfer: NewPendingTransfer) -> Result<PendingTransfer, DatabaseError> {
        let stored = PendingTransfer {
            reference: transfer.reference.clone(),
            payer_email: transfer.payer_email,
            recipient_email: transfer.recipient_email,
            amount: transfer.amount,
            created_at: Utc::now(),
        };
        self.transfers
            .lock()
            .unwrap()
            .insert(transfer.reference, stored.clone());
        Ok(stored)
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<PendingTransfer>, DatabaseError> {
        Ok(self.transfers.lock().unwrap().get(reference).cloned())
    }

    async fn delete(&self, reference: &str) -> Result<bool, DatabaseError> {
        Ok(self.transfers.lock().unwrap().remove(reference).is_some())
    }
}

/// Scripted gateway double that counts calls and captures the wire amount.
pub struct MockGateway {
    pub initiate_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub last_initiate_minor_amount: AtomicI64,
    initiated: InitiatedPayment,
    verify_result: GatewayResult<VerifiedPayment>,
}

impl MockGateway {
    pub fn new(reference: &str, verify_result: GatewayResult<VerifiedPayment>) -> Self {
        Self {
            initiate_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            last_initiate_minor_amount: AtomicI64::new(0),
            initiated: InitiatedPayment {
                authorization_url: format!("https://checkout.paystack.test/{}", reference),
                access_code: format!("access_{}", reference),
                reference: reference.to_string(),
            },
            verify_result,
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initiate(
        &self,
        _payer_email: &str,
        amount: &BigDecimal,
    ) -> GatewayResult<InitiatedPayment> {
        self.initiate_calls.fetch_add(1, Ordering::SeqCst);
        let minor = to_minor_units(amount)?;
        self.last_initiate_minor_amount.store(minor, Ordering::SeqCst);
        Ok(self.initiated.clone())
    }

    async fn verify(&self, _reference: &str) -> GatewayResult<VerifiedPayment> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify_result.clone()
    }
}

/// A verified payment as the gateway would report it for a ZAR 100 charge.
pub fn verified_payment(transaction_id: i64, minor_amount: i64, reference: &str) -> VerifiedPayment {
    VerifiedPayment {
        transaction_id,
        amount: demobank_backend::gateway::types::from_minor_units(minor_amount),
        currency: "ZAR".to_string(),
        status: "success".to_string(),
        customer_email: "a@x.com".to_string(),
        customer_id: 9001,
        channel: Some("card".to_string()),
        paid_at: Some("2026-02-12T00:00:00Z".to_string()),
        reference: reference.to_string(),
    }
}

/// Gateway-reported failure, as a `status: false` envelope surfaces it.
pub fn provider_error(message: &str) -> GatewayError {
    GatewayError::ProviderError {
        message: message.to_string(),
        http_status: None,
    }
}
