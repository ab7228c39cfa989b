use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Gateway request timed out after {timeout_secs}s")]
    TimeoutError { timeout_secs: u64 },

    #[error("Gateway error: {message}")]
    ProviderError {
        message: String,
        http_status: Option<u16>,
    },

    #[error("Invalid gateway response: {message}")]
    SchemaError { message: String },
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::ValidationError { .. } => false,
            GatewayError::NetworkError { .. } => true,
            GatewayError::TimeoutError { .. } => true,
            GatewayError::ProviderError { http_status, .. } => {
                matches!(http_status, Some(status) if *status >= 500)
            }
            GatewayError::SchemaError { .. } => false,
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            GatewayError::ValidationError { .. } => 400,
            GatewayError::NetworkError { .. } => 503,
            GatewayError::TimeoutError { .. } => 504,
            GatewayError::ProviderError { .. } => 502,
            GatewayError::SchemaError { .. } => 502,
        }
    }
}
