//! Unified error handling for the demobank backend
//!
//! Provides a single application error type with HTTP status mapping,
//! stable machine-readable error codes, and user-facing messages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::database::error::DatabaseError;
use crate::gateway::error::GatewayError;

/// Error codes for programmatic client handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Domain errors (4xx)
    #[serde(rename = "RECIPIENT_NOT_FOUND")]
    RecipientNotFound,
    #[serde(rename = "MISSING_REFERENCE")]
    MissingReference,
    #[serde(rename = "PENDING_TRANSFER_NOT_FOUND")]
    PendingTransferNotFound,
    #[serde(rename = "PROFILE_EXISTS")]
    ProfileExists,

    // Recording failed after the gateway settled the payment (5xx, reconcile manually)
    #[serde(rename = "RECORDING_ERROR")]
    RecordingError,

    // Infrastructure errors (5xx)
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    #[serde(rename = "CONFIGURATION_ERROR")]
    ConfigurationError,

    // External errors (502, 504)
    #[serde(rename = "GATEWAY_ERROR")]
    GatewayError,
    #[serde(rename = "EXTERNAL_SERVICE_TIMEOUT")]
    ExternalServiceTimeout,

    // Generic
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
}

/// Domain-specific business logic errors
#[derive(Debug, Clone)]
pub enum DomainError {
    /// Recipient email has no matching bank profile
    RecipientNotFound { email: String },
    /// Callback route reached without a payment reference
    MissingReference,
    /// No pending transfer stored for the verified reference
    PendingTransferNotFound { reference: String },
    /// A bank profile already exists for this email
    ProfileExists { email: String },
    /// Persisting a verified payment failed; the gateway considers it settled
    RecordingFailed {
        gateway_transaction_id: i64,
        message: String,
    },
}

/// Infrastructure-level errors (database, configuration)
#[derive(Debug, Clone)]
pub enum InfrastructureError {
    /// Database connection or query failure
    Database { message: String, is_retryable: bool },
    /// Missing or invalid configuration
    Configuration { message: String },
}

/// External service errors (payment gateway)
#[derive(Debug, Clone)]
pub enum ExternalError {
    /// Gateway transport failure or gateway-reported failure
    Gateway { message: String, is_retryable: bool },
    /// External service timeout
    Timeout { service: String, timeout_secs: u64 },
}

/// Input validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Invalid amount (format or value)
    InvalidAmount { amount: String, reason: String },
    /// Required field missing
    MissingField { field: String },
    /// Field value is malformed
    InvalidField { field: String, reason: String },
}

/// Unified application error type
#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub request_id: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub enum AppErrorKind {
    Domain(DomainError),
    Infrastructure(InfrastructureError),
    External(ExternalError),
    Validation(ValidationError),
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self {
            kind,
            request_id: None,
            context: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn validation(err: ValidationError) -> Self {
        Self::new(AppErrorKind::Validation(err))
    }

    pub fn domain(err: DomainError) -> Self {
        Self::new(AppErrorKind::Domain(err))
    }

    /// Map error to HTTP status code
    pub fn status_code(&self) -> u16 {
        match &self.kind {
            AppErrorKind::Domain(err) => match err {
                DomainError::RecipientNotFound { .. } => 404,
                DomainError::MissingReference => 400,
                DomainError::PendingTransferNotFound { .. } => 404,
                DomainError::ProfileExists { .. } => 409, // Conflict
                DomainError::RecordingFailed { .. } => 500,
            },
            AppErrorKind::Infrastructure(err) => match err {
                InfrastructureError::Database { .. } => 500,
                InfrastructureError::Configuration { .. } => 500,
            },
            AppErrorKind::External(err) => match err {
                ExternalError::Gateway { .. } => 502, // Bad Gateway
                ExternalError::Timeout { .. } => 504, // Gateway Timeout
            },
            AppErrorKind::Validation(_) => 400,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> ErrorCode {
        match &self.kind {
            AppErrorKind::Domain(err) => match err {
                DomainError::RecipientNotFound { .. } => ErrorCode::RecipientNotFound,
                DomainError::MissingReference => ErrorCode::MissingReference,
                DomainError::PendingTransferNotFound { .. } => ErrorCode::PendingTransferNotFound,
                DomainError::ProfileExists { .. } => ErrorCode::ProfileExists,
                DomainError::RecordingFailed { .. } => ErrorCode::RecordingError,
            },
            AppErrorKind::Infrastructure(err) => match err {
                InfrastructureError::Database { .. } => ErrorCode::DatabaseError,
                InfrastructureError::Configuration { .. } => ErrorCode::ConfigurationError,
            },
            AppErrorKind::External(err) => match err {
                ExternalError::Gateway { .. } => ErrorCode::GatewayError,
                ExternalError::Timeout { .. } => ErrorCode::ExternalServiceTimeout,
            },
            AppErrorKind::Validation(_) => ErrorCode::ValidationError,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match &self.kind {
            AppErrorKind::Domain(err) => match err {
                DomainError::RecipientNotFound { email } => {
                    format!("Recipient '{}' was not found in our system", email)
                }
                DomainError::MissingReference => {
                    "No payment reference found in the callback".to_string()
                }
                DomainError::PendingTransferNotFound { reference } => {
                    format!("No pending transfer found for reference '{}'", reference)
                }
                DomainError::ProfileExists { email } => {
                    format!("A bank profile already exists for '{}'", email)
                }
                DomainError::RecordingFailed { gateway_transaction_id, .. } => {
                    format!(
                        "Payment {} was confirmed by the gateway but could not be recorded. Please contact support",
                        gateway_transaction_id
                    )
                }
            },
            AppErrorKind::Infrastructure(_) => {
                "Service temporarily unavailable. Please try again later".to_string()
            }
            AppErrorKind::External(err) => match err {
                ExternalError::Gateway { message, is_retryable } => {
                    if *is_retryable {
                        "Payment gateway is temporarily unavailable. Please try again".to_string()
                    } else {
                        format!("Payment gateway error: {}", message)
                    }
                }
                ExternalError::Timeout {
                    service,
                    timeout_secs,
                } => {
                    format!(
                        "{} request timed out after {} seconds. Please try again",
                        service, timeout_secs
                    )
                }
            },
            AppErrorKind::Validation(err) => match err {
                ValidationError::InvalidAmount { amount, reason } => {
                    format!("Invalid amount '{}': {}", amount, reason)
                }
                ValidationError::MissingField { field } => {
                    format!("Required field '{}' is missing", field)
                }
                ValidationError::InvalidField { field, reason } => {
                    format!("Invalid value for '{}': {}", field, reason)
                }
            },
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            AppErrorKind::Domain(err) => {
                // The gateway settled but the local write failed; a resubmit of the
                // callback route can complete the recording.
                matches!(err, DomainError::RecordingFailed { .. })
            }
            AppErrorKind::Infrastructure(err) => match err {
                InfrastructureError::Database { is_retryable, .. } => *is_retryable,
                InfrastructureError::Configuration { .. } => false,
            },
            AppErrorKind::External(err) => match err {
                ExternalError::Gateway { is_retryable, .. } => *is_retryable,
                ExternalError::Timeout { .. } => true,
            },
            AppErrorKind::Validation(_) => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for AppError {}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let kind = match err {
            GatewayError::ValidationError { message, field } => match field {
                Some(field) => AppErrorKind::Validation(ValidationError::InvalidField {
                    field,
                    reason: message,
                }),
                None => AppErrorKind::Validation(ValidationError::InvalidField {
                    field: "request".to_string(),
                    reason: message,
                }),
            },
            GatewayError::NetworkError { message } => AppErrorKind::External(ExternalError::Gateway {
                message,
                is_retryable: true,
            }),
            GatewayError::TimeoutError { timeout_secs } => {
                AppErrorKind::External(ExternalError::Timeout {
                    service: "payment gateway".to_string(),
                    timeout_secs,
                })
            }
            GatewayError::ProviderError { message, .. } => {
                AppErrorKind::External(ExternalError::Gateway {
                    message,
                    is_retryable: false,
                })
            }
            GatewayError::SchemaError { message } => AppErrorKind::External(ExternalError::Gateway {
                message: format!("invalid gateway response: {}", message),
                is_retryable: false,
            }),
        };

        AppError::new(kind)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::new(AppErrorKind::Infrastructure(InfrastructureError::Database {
            is_retryable: err.is_retryable(),
            message: err.to_string(),
        }))
    }
}

/// Result type for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_not_found_maps_to_404() {
        let error = AppError::new(AppErrorKind::Domain(DomainError::RecipientNotFound {
            email: "ghost@nowhere.test".to_string(),
        }));

        assert_eq!(error.status_code(), 404);
        assert_eq!(error.error_code(), ErrorCode::RecipientNotFound);
        assert!(error.user_message().contains("ghost@nowhere.test"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn missing_reference_maps_to_400() {
        let error = AppError::new(AppErrorKind::Domain(DomainError::MissingReference));

        assert_eq!(error.status_code(), 400);
        assert_eq!(error.error_code(), ErrorCode::MissingReference);
    }

    #[test]
    fn recording_failure_is_distinct_from_gateway_failure() {
        let recording = AppError::new(AppErrorKind::Domain(DomainError::RecordingFailed {
            gateway_transaction_id: 77,
            message: "insert failed".to_string(),
        }));
        let gateway = AppError::new(AppErrorKind::External(ExternalError::Gateway {
            message: "declined".to_string(),
            is_retryable: false,
        }));

        assert_ne!(recording.error_code(), gateway.error_code());
        assert_eq!(recording.error_code(), ErrorCode::RecordingError);
        assert!(recording.user_message().contains("contact support"));
    }

    #[test]
    fn gateway_network_errors_are_retryable() {
        let error: AppError = GatewayError::NetworkError {
            message: "connection reset".to_string(),
        }
        .into();

        assert_eq!(error.status_code(), 502);
        assert!(error.is_retryable());
    }

    #[test]
    fn validation_errors_are_not_retryable() {
        let error = AppError::validation(ValidationError::InvalidAmount {
            amount: "-100".to_string(),
            reason: "amount must be greater than zero".to_string(),
        });

        assert_eq!(error.status_code(), 400);
        assert!(!error.is_retryable());
    }
}
