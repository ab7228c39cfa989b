use crate::gateway::error::{GatewayError, GatewayResult};
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Result of opening a payment session with the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatedPayment {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Normalized result of verifying a payment reference.
///
/// Amounts are in major currency units; the gateway wire format uses minor
/// units and the conversion happens at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedPayment {
    pub transaction_id: i64,
    pub amount: BigDecimal,
    pub currency: String,
    pub status: String,
    pub customer_email: String,
    pub customer_id: i64,
    pub channel: Option<String>,
    pub paid_at: Option<String>,
    pub reference: String,
}

/// Convert a major-unit amount to the gateway's minor units, rounding to the
/// nearest whole minor unit.
pub fn to_minor_units(amount: &BigDecimal) -> GatewayResult<i64> {
    if amount <= &BigDecimal::from(0) {
        return Err(GatewayError::ValidationError {
            message: "amount must be greater than zero".to_string(),
            field: Some("amount".to_string()),
        });
    }

    (amount * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
        .ok_or_else(|| GatewayError::ValidationError {
            message: format!("amount out of range: {}", amount),
            field: Some("amount".to_string()),
        })
}

/// Convert a gateway minor-unit amount back to major units.
pub fn from_minor_units(minor: i64) -> BigDecimal {
    BigDecimal::from(minor) / BigDecimal::from(100)
}
