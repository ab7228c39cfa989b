use crate::config::GatewayConfig;
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::http::GatewayHttpClient;
use crate::gateway::types::{from_minor_units, to_minor_units, InitiatedPayment, VerifiedPayment};
use crate::gateway::PaymentGateway;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

pub struct PaystackClient {
    config: GatewayConfig,
    http: GatewayHttpClient,
}

impl PaystackClient {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        if config.secret_key.trim().is_empty() {
            return Err(GatewayError::ValidationError {
                message: "gateway secret key is required".to_string(),
                field: Some("secret_key".to_string()),
            });
        }
        let http = GatewayHttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn unwrap_envelope<T>(envelope: PaystackEnvelope<T>) -> GatewayResult<T> {
        if !envelope.status {
            return Err(GatewayError::ProviderError {
                message: envelope.message,
                http_status: None,
            });
        }
        envelope.data.ok_or_else(|| GatewayError::SchemaError {
            message: "gateway reported success without a data payload".to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initiate(
        &self,
        payer_email: &str,
        amount: &BigDecimal,
    ) -> GatewayResult<InitiatedPayment> {
        if payer_email.trim().is_empty() {
            return Err(GatewayError::ValidationError {
                message: "payer email is required for payment initialization".to_string(),
                field: Some("email".to_string()),
            });
        }
        let minor_amount = to_minor_units(amount)?;

        let payload = serde_json::json!({
            "email": payer_email,
            "amount": minor_amount,
            "callback_url": self.config.callback_url,
        });

        let raw: PaystackEnvelope<PaystackInitializeData> = self
            .http
            .request_json(
                reqwest::Method::POST,
                &self.endpoint("/transaction/initialize"),
                &self.config.secret_key,
                Some(&payload),
            )
            .await?;

        let data = Self::unwrap_envelope(raw)?;
        info!(reference = %data.reference, "payment session initiated");

        Ok(InitiatedPayment {
            authorization_url: data.authorization_url,
            access_code: data.access_code,
            reference: data.reference,
        })
    }

    async fn verify(&self, reference: &str) -> GatewayResult<VerifiedPayment> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(GatewayError::ValidationError {
                message: "reference is required".to_string(),
                field: Some("reference".to_string()),
            });
        }

        let raw: PaystackEnvelope<PaystackVerifyData> = self
            .http
            .request_json(
                reqwest::Method::GET,
                &self.endpoint(&format!("/transaction/verify/{}", reference)),
                &self.config.secret_key,
                None,
            )
            .await?;

        let data = Self::unwrap_envelope(raw)?;
        info!(
            reference = %reference,
            transaction_id = data.id,
            status = %data.status,
            "payment verified with gateway"
        );

        Ok(VerifiedPayment {
            transaction_id: data.id,
            amount: from_minor_units(data.amount),
            currency: data.currency,
            status: data.status,
            customer_email: data.customer.email,
            customer_id: data.customer.id,
            channel: data.channel,
            paid_at: data.paid_at,
            reference: data.reference,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PaystackEnvelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct PaystackInitializeData {
    authorization_url: String,
    access_code: String,
    reference: String,
}

#[derive(Debug, Default, Deserialize)]
struct PaystackVerifyData {
    id: i64,
    amount: i64,
    currency: String,
    status: String,
    reference: String,
    customer: PaystackCustomer,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    paid_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PaystackCustomer {
    id: i64,
    email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn client() -> PaystackClient {
        PaystackClient::new(GatewayConfig {
            secret_key: "sk_test".to_string(),
            base_url: "https://api.paystack.co".to_string(),
            callback_url: "http://127.0.0.1:8000/payment/verify".to_string(),
            timeout_secs: 5,
        })
        .expect("client init should succeed")
    }

    #[test]
    fn empty_secret_key_is_rejected() {
        let result = PaystackClient::new(GatewayConfig {
            secret_key: "".to_string(),
            base_url: "https://api.paystack.co".to_string(),
            callback_url: "http://127.0.0.1:8000/payment/verify".to_string(),
            timeout_secs: 5,
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn initiate_rejects_empty_email_without_calling_gateway() {
        let client = client();
        let amount = BigDecimal::from_str("100").unwrap();
        let result = client.initiate("   ", &amount).await;
        assert!(matches!(
            result,
            Err(GatewayError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn verify_rejects_empty_reference_without_calling_gateway() {
        let client = client();
        let result = client.verify("  ").await;
        assert!(matches!(
            result,
            Err(GatewayError::ValidationError { .. })
        ));
    }

    #[test]
    fn failed_envelope_propagates_gateway_message() {
        let envelope: PaystackEnvelope<PaystackVerifyData> = serde_json::from_value(
            serde_json::json!({"status": false, "message": "Transaction reference not found"}),
        )
        .expect("envelope should deserialize");

        let err = PaystackClient::unwrap_envelope(envelope).unwrap_err();
        match err {
            GatewayError::ProviderError { message, .. } => {
                assert_eq!(message, "Transaction reference not found")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn verify_payload_normalizes_to_major_units() {
        let envelope: PaystackEnvelope<PaystackVerifyData> = serde_json::from_value(
            serde_json::json!({
                "status": true,
                "message": "Verification successful",
                "data": {
                    "id": 77,
                    "amount": 10000,
                    "currency": "ZAR",
                    "status": "success",
                    "reference": "ref123",
                    "channel": "card",
                    "paid_at": "2026-02-12T00:00:00Z",
                    "customer": {"id": 42, "email": "a@x.com"}
                }
            }),
        )
        .expect("envelope should deserialize");

        let data = PaystackClient::unwrap_envelope(envelope).expect("data should be present");
        assert_eq!(data.id, 77);
        assert_eq!(from_minor_units(data.amount), BigDecimal::from(100));
        assert_eq!(data.customer.email, "a@x.com");
    }
}
