pub mod error;
pub mod http;
pub mod paystack;
pub mod types;

use crate::gateway::error::GatewayResult;
use crate::gateway::types::{InitiatedPayment, VerifiedPayment};
use async_trait::async_trait;
use bigdecimal::BigDecimal;

pub use paystack::PaystackClient;

/// Seam to the hosted payment gateway.
///
/// `initiate` opens a payment session and returns the URL the browser must
/// be redirected to; `verify` resolves the reference the gateway hands back
/// on the callback route into a normalized payment result.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate(
        &self,
        payer_email: &str,
        amount: &BigDecimal,
    ) -> GatewayResult<InitiatedPayment>;

    async fn verify(&self, reference: &str) -> GatewayResult<VerifiedPayment>;
}
