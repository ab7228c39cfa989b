//! Payment flow orchestration
//!
//! Sequences recipient validation, gateway initiation, the redirect
//! hand-off, callback verification and idempotent recording for a single
//! payment attempt.

use crate::database::pending_transfer_repository::NewPendingTransfer;
use crate::database::repository::{PendingTransferStore, ProfileStore, TransactionStore};
use crate::database::transaction_repository::TransactionRecord;
use crate::error::{AppError, DomainError, ValidationError};
use crate::gateway::PaymentGateway;
use crate::services::recipient::RecipientValidator;
use crate::services::recorder::TransactionRecorder;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Lifecycle of one payment attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// Nothing submitted yet
    Idle,
    /// Input accepted, resolving the recipient
    Validating,
    /// Opening a payment session with the gateway
    Initiating,
    /// Browser handed off to the gateway; waiting for the callback
    AwaitingRedirectReturn,
    /// Callback received, verifying the reference
    Verifying,
    /// Verified and recorded exactly once
    Recorded,
    /// Attempt failed; the user may start over
    Failed,
}

impl AttemptState {
    /// Get all valid transitions from this state
    pub fn valid_transitions(&self) -> Vec<AttemptState> {
        match self {
            AttemptState::Idle => vec![AttemptState::Validating],
            AttemptState::Validating => vec![AttemptState::Initiating, AttemptState::Failed],
            AttemptState::Initiating => {
                vec![AttemptState::AwaitingRedirectReturn, AttemptState::Failed]
            }
            AttemptState::AwaitingRedirectReturn => {
                vec![AttemptState::Verifying, AttemptState::Failed]
            }
            AttemptState::Verifying => vec![AttemptState::Recorded, AttemptState::Failed],
            // Terminal states for this attempt
            AttemptState::Recorded => vec![],
            AttemptState::Failed => vec![],
        }
    }

    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Recorded | AttemptState::Failed)
    }
}

impl std::fmt::Display for AttemptState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptState::Idle => write!(f, "idle"),
            AttemptState::Validating => write!(f, "validating"),
            AttemptState::Initiating => write!(f, "initiating"),
            AttemptState::AwaitingRedirectReturn => write!(f, "awaiting_redirect_return"),
            AttemptState::Verifying => write!(f, "verifying"),
            AttemptState::Recorded => write!(f, "recorded"),
            AttemptState::Failed => write!(f, "failed"),
        }
    }
}

/// A submitted payment request
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub payer_email: String,
    pub recipient_email: String,
    pub amount: BigDecimal,
}

/// Outcome of a successful submission: where to send the browser
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub authorization_url: String,
    pub reference: String,
}

/// Outcome of a successful callback verification
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmOutcome {
    pub record: TransactionRecord,
}

pub struct PaymentFlow {
    gateway: Arc<dyn PaymentGateway>,
    validator: RecipientValidator,
    recorder: TransactionRecorder,
    pending: Arc<dyn PendingTransferStore>,
}

impl PaymentFlow {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        profiles: Arc<dyn ProfileStore>,
        transactions: Arc<dyn TransactionStore>,
        pending: Arc<dyn PendingTransferStore>,
    ) -> Self {
        Self {
            gateway,
            validator: RecipientValidator::new(profiles),
            recorder: TransactionRecorder::new(transactions),
            pending,
        }
    }

    /// Handle a payment form submission.
    ///
    /// Validation failures make zero external calls; an unresolvable
    /// recipient fails before the gateway is contacted; a gateway failure
    /// leaves no pending transfer behind.
    pub async fn submit(&self, request: SubmitRequest) -> Result<SubmitOutcome, AppError> {
        Self::validate_submit(&request)?;

        info!(
            payer = %request.payer_email,
            recipient = %request.recipient_email,
            amount = %request.amount,
            state = %AttemptState::Validating,
            "payment submitted"
        );
        self.validator.resolve(&request.recipient_email).await?;

        info!(state = %AttemptState::Initiating, "recipient resolved, opening gateway session");
        let initiated = self
            .gateway
            .initiate(&request.payer_email, &request.amount)
            .await?;

        // The pending transfer must exist before the browser leaves for the
        // gateway, otherwise the callback has nothing to consume.
        self.pending
            .put(NewPendingTransfer {
                reference: initiated.reference.clone(),
                payer_email: request.payer_email.clone(),
                recipient_email: request.recipient_email.clone(),
                amount: request.amount.clone(),
            })
            .await?;

        info!(
            reference = %initiated.reference,
            state = %AttemptState::AwaitingRedirectReturn,
            "pending transfer stored, redirecting to gateway"
        );

        Ok(SubmitOutcome {
            authorization_url: initiated.authorization_url,
            reference: initiated.reference,
        })
    }

    /// Handle the gateway callback route.
    ///
    /// A missing reference fails immediately with no gateway call. On any
    /// failure after that the pending transfer is left in place so a reload
    /// of the callback route can retry verification; it is deleted only once
    /// the transaction is durably recorded.
    pub async fn confirm(&self, reference: Option<&str>) -> Result<ConfirmOutcome, AppError> {
        let reference = match reference.map(str::trim) {
            Some(reference) if !reference.is_empty() => reference,
            _ => return Err(AppError::domain(DomainError::MissingReference)),
        };

        info!(reference = %reference, state = %AttemptState::Verifying, "verifying payment");
        let payment = self.gateway.verify(reference).await?;

        let pending = self
            .pending
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| {
                AppError::domain(DomainError::PendingTransferNotFound {
                    reference: reference.to_string(),
                })
            })?;

        let recipient = self.validator.resolve(&pending.recipient_email).await?;
        let record = self
            .recorder
            .record_if_absent(&payment, &recipient.email)
            .await?;

        // The record is durable; a failed delete only means a later reload
        // re-runs the idempotent path and deletes it then.
        match self.pending.delete(reference).await {
            Ok(_) => {}
            Err(err) => {
                warn!(reference = %reference, error = %err, "failed to delete pending transfer");
            }
        }

        info!(
            reference = %reference,
            gateway_transaction_id = record.gateway_transaction_id,
            state = %AttemptState::Recorded,
            "payment recorded"
        );

        Ok(ConfirmOutcome { record })
    }

    fn validate_submit(request: &SubmitRequest) -> Result<(), AppError> {
        if request.payer_email.trim().is_empty() {
            return Err(AppError::validation(ValidationError::MissingField {
                field: "payer_email".to_string(),
            }));
        }
        if !request.payer_email.contains('@') {
            return Err(AppError::validation(ValidationError::InvalidField {
                field: "payer_email".to_string(),
                reason: "must be an email address".to_string(),
            }));
        }
        if request.recipient_email.trim().is_empty() {
            return Err(AppError::validation(ValidationError::MissingField {
                field: "recipient_email".to_string(),
            }));
        }
        if !request.recipient_email.contains('@') {
            return Err(AppError::validation(ValidationError::InvalidField {
                field: "recipient_email".to_string(),
                reason: "must be an email address".to_string(),
            }));
        }
        if request.amount <= BigDecimal::from(0) {
            return Err(AppError::validation(ValidationError::InvalidAmount {
                amount: request.amount.to_string(),
                reason: "amount must be greater than zero".to_string(),
            }));
        }

        Ok(())
    }
}
