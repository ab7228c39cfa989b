use crate::gateway::error::{GatewayError, GatewayResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Thin JSON client for gateway calls.
///
/// Every request carries a hard timeout; failures are surfaced to the caller
/// unchanged rather than retried, so the user decides whether to resubmit.
#[derive(Clone)]
pub struct GatewayHttpClient {
    client: Client,
    timeout: Duration,
}

impl GatewayHttpClient {
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client =
            Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| GatewayError::NetworkError {
                    message: format!("failed to initialize HTTP client: {}", e),
                })?;

        Ok(Self { client, timeout })
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        bearer_token: &str,
        body: Option<&JsonValue>,
    ) -> GatewayResult<T> {
        let mut request = self
            .client
            .request(method, url)
            .timeout(self.timeout)
            .bearer_auth(bearer_token);
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::TimeoutError {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                GatewayError::NetworkError {
                    message: format!("gateway request failed: {}", e),
                }
            }
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(GatewayError::ProviderError {
                message: format!("HTTP {}: {}", status, text),
                http_status: Some(status.as_u16()),
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| GatewayError::SchemaError {
            message: e.to_string(),
        })
    }
}
