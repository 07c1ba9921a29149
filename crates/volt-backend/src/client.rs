//! # Backend Client
//!
//! HTTP client for the platform backend's payment endpoints.
//!
//! A 200 from the backend is not trusted blindly: the initiate contract
//! (`paymentLink` + `txRef`, both non-empty) is re-validated here, and a
//! malformed success is reported as a backend fault. Webhook forwards carry
//! provenance headers and are bounded by a shorter timeout because their
//! result is discarded by the caller.

use crate::config::BackendConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use volt_core::{EdgeError, EdgeResult, InitiateRequest, InitiateResult};

/// Provenance headers attached to forwarded webhooks
pub const WEBHOOK_SOURCE_HEADER: &str = "X-Webhook-Source";
pub const SIGNATURE_VERIFIED_HEADER: &str = "X-Signature-Verified";
pub const DELIVERY_ID_HEADER: &str = "X-Delivery-ID";

/// Trusted identity header propagated to the backend
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Payment provider whose webhooks this edge verifies
pub const WEBHOOK_SOURCE: &str = "flutterwave";

const FORWARD_TIMEOUT: Duration = Duration::from_secs(15);

/// Shape of a backend error body, as far as the edge cares
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
}

/// Client for the platform backend
#[derive(Clone)]
pub struct BackendClient {
    config: BackendConfig,
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Start a payment for a user.
    ///
    /// Propagates `Authorization` and `X-User-ID` unchanged and forwards
    /// `{ amount, userId }` to the backend. The backend's success shape is
    /// re-validated before it is trusted.
    #[instrument(skip(self, authorization))]
    pub async fn initiate_payment(
        &self,
        amount: f64,
        user_id: &str,
        authorization: &str,
    ) -> EdgeResult<InitiateResult> {
        let request = InitiateRequest {
            amount,
            user_id: user_id.to_string(),
        };

        debug!("forwarding payment initiation to backend");

        let response = self
            .client
            .post(self.config.initiate_url())
            .header("Authorization", authorization)
            .header(USER_ID_HEADER, user_id)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<BackendErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| format!("Backend returned HTTP {}", status.as_u16()));
            return Err(EdgeError::BackendRejected {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|_| {
            EdgeError::BackendContract("Backend response was not valid JSON".to_string())
        })?;

        let payment_link = non_empty_str(&value, "paymentLink");
        let tx_ref = non_empty_str(&value, "txRef");

        match (payment_link, tx_ref) {
            (Some(payment_link), Some(tx_ref)) => {
                info!(tx_ref = %tx_ref, "payment initiated");
                Ok(InitiateResult {
                    payment_link,
                    tx_ref,
                })
            }
            (payment_link, tx_ref) => {
                let mut missing = Vec::new();
                if payment_link.is_none() {
                    missing.push("paymentLink");
                }
                if tx_ref.is_none() {
                    missing.push("txRef");
                }
                Err(EdgeError::BackendContract(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Hand a verified webhook payload to the backend.
    ///
    /// One attempt, bounded timeout; redelivery is the provider's job. The
    /// caller decides what to do with a failure (the webhook handler only
    /// logs it, because the provider has already been acknowledged).
    #[instrument(skip(self, payload))]
    pub async fn forward_webhook(&self, payload: &Value, delivery_id: Uuid) -> EdgeResult<()> {
        let response = self
            .client
            .post(self.config.webhook_url())
            .timeout(FORWARD_TIMEOUT)
            .header(WEBHOOK_SOURCE_HEADER, WEBHOOK_SOURCE)
            .header(SIGNATURE_VERIFIED_HEADER, "true")
            .header(DELIVERY_ID_HEADER, delivery_id.to_string())
            .json(payload)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EdgeError::BackendRejected {
                status: status.as_u16(),
                message: format!("Webhook forward rejected: {}", body),
            });
        }

        info!("webhook forwarded to backend");
        Ok(())
    }
}

fn network_error(err: reqwest::Error) -> EdgeError {
    if err.is_timeout() {
        EdgeError::Network("Backend request timeout".to_string())
    } else {
        EdgeError::Network(format!("Backend request failed: {}", err))
    }
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}
