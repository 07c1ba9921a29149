//! # Payment Initiation Types
//!
//! Request/result types for the payment initiation proxy, plus amount
//! validation. The user identity always comes from a trusted header, never
//! from the request body.

use crate::error::{EdgeError, EdgeResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Smallest amount the platform accepts
pub const MIN_AMOUNT: f64 = 1.0;

/// Payload forwarded to the backend's payment-initiate endpoint
#[derive(Debug, Clone, Serialize)]
pub struct InitiateRequest {
    /// Amount in the platform currency
    pub amount: f64,

    /// Caller identity, taken from the trusted `x-user-id` header
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// A successful initiation as returned to the caller.
///
/// Both fields are required non-empty; a backend 200 lacking either is a
/// backend fault, not a success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiateResult {
    #[serde(rename = "paymentLink")]
    pub payment_link: String,

    #[serde(rename = "txRef")]
    pub tx_ref: String,
}

/// Validate the `amount` field of an initiation request body.
///
/// JSON cannot encode NaN or infinities, but the finiteness check stays so
/// this function is safe against any `Value` a caller hands it.
pub fn validate_amount(value: Option<&Value>) -> EdgeResult<f64> {
    let value = value.ok_or_else(|| EdgeError::Validation("amount is required".to_string()))?;

    let amount = value
        .as_f64()
        .filter(|a| a.is_finite())
        .ok_or_else(|| EdgeError::Validation("Amount must be a valid number".to_string()))?;

    if amount < 0.0 {
        return Err(EdgeError::Validation("Amount must be positive".to_string()));
    }

    if amount < MIN_AMOUNT {
        return Err(EdgeError::Validation("Minimum amount is 1".to_string()));
    }

    Ok(amount)
}
