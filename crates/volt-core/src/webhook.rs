//! # Webhook Payload Summary
//!
//! The edge treats webhook payloads as opaque JSON; the only schema
//! knowledge it has is a handful of optional fields worth logging for
//! monitoring. Flutterwave nests transaction fields under `data`, so lookups
//! check the top level first and fall back there.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Monitoring fields extracted from a verified webhook payload
#[derive(Debug, Clone)]
pub struct WebhookSummary {
    pub event: Option<String>,
    pub tx_ref: Option<String>,
    pub status: Option<String>,
    pub amount: Option<f64>,
    pub received_at: DateTime<Utc>,
}

impl WebhookSummary {
    /// Extract the known fields from a payload, if present
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            event: str_field(payload, "event"),
            tx_ref: str_field(payload, "tx_ref"),
            status: str_field(payload, "status"),
            amount: num_field(payload, "amount"),
            received_at: Utc::now(),
        }
    }
}

fn str_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .or_else(|| {
            payload
                .get("data")
                .and_then(|data| data.get(key))
                .and_then(|v| v.as_str())
        })
        .map(String::from)
}

fn num_field(payload: &Value, key: &str) -> Option<f64> {
    payload
        .get(key)
        .and_then(|v| v.as_f64())
        .or_else(|| {
            payload
                .get("data")
                .and_then(|data| data.get(key))
                .and_then(|v| v.as_f64())
        })
}
