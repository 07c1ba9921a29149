//! # volt-core
//!
//! Core types for the voltgate payment edge.
//!
//! This crate provides:
//! - `EdgeError` for typed error handling with an HTTP error taxonomy
//! - HMAC-SHA256 webhook signature verification utilities
//! - `InitiateRequest` / `InitiateResult` for the payment initiation proxy
//! - `WebhookSummary` for structured logging of verified webhook payloads
//!
//! ## Example
//!
//! ```rust,ignore
//! use volt_core::signature::{extract_signature, is_valid_signature, WebhookHeaders};
//!
//! // In a webhook endpoint:
//! let signature = extract_signature(WebhookHeaders::Typed(&headers))
//!     .ok_or(EdgeError::BadRequest("Webhook signature is required".into()))?;
//!
//! if !is_valid_signature(raw_body, &signature, &secret) {
//!     return Err(EdgeError::Unauthorized("Invalid webhook signature".into()));
//! }
//! ```

pub mod error;
pub mod initiate;
pub mod signature;
pub mod webhook;

// Re-exports for convenience
pub use error::{EdgeError, EdgeResult};
pub use initiate::{validate_amount, InitiateRequest, InitiateResult, MIN_AMOUNT};
pub use signature::{
    extract_signature, generate_signature, is_valid_signature, is_valid_signature_detailed,
    RawHeaderValue, ValidationDetails, ValidationOptions, ValidationOutcome, WebhookHeaders,
    SIGNATURE_HEADER,
};
pub use webhook::WebhookSummary;
