//! # Webhook Signature Verification
//!
//! HMAC-SHA256 verification for inbound payment-provider webhooks.
//!
//! Flutterwave signs each delivery by sending the hex digest of the raw
//! request body in the `verif-hash` header. Verification must run against
//! the exact bytes received, before any JSON parsing, so a payload modified
//! after signing is rejected even when the modification preserves JSON
//! semantics (key reordering, whitespace).
//!
//! Signature and secret are checked structurally before any cryptographic
//! operation runs; malformed input never reaches the HMAC primitive, and
//! every failure path returns `false` rather than propagating an error out
//! of this module.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the provider's signature over the raw body
pub const SIGNATURE_HEADER: &str = "verif-hash";

/// Hex-encoded HMAC-SHA256 digests are exactly 64 characters
const MIN_SIGNATURE_LENGTH: usize = 64;
const MAX_SIGNATURE_LENGTH: usize = 64;

/// Default cap on payload size for the detailed validator (1 MiB)
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Compute HMAC-SHA256(secret, payload) and return the raw MAC bytes
fn hmac_sha256(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Compute the signature for a payload under a secret.
///
/// Output is lowercase hex, always exactly 64 characters. This is the
/// sending-side counterpart of [`is_valid_signature`] and is what tests use
/// to produce well-formed deliveries.
pub fn generate_signature(payload: &str, secret: &str) -> String {
    hex::encode(hmac_sha256(payload.as_bytes(), secret.as_bytes()))
}

/// Verify a claimed signature against a payload and secret.
///
/// The claimed signature must be exactly 64 hex characters; length and
/// charset are rejected before any crypto runs. The comparison is a
/// constant-time fold over the decoded bytes, not a short-circuiting string
/// equality. Never panics: malformed input logs a diagnostic and yields
/// `false`.
pub fn is_valid_signature(payload: &str, claimed: &str, secret: &str) -> bool {
    if secret.is_empty() {
        warn!("signature verification attempted with empty secret");
        return false;
    }

    if claimed.len() < MIN_SIGNATURE_LENGTH || claimed.len() > MAX_SIGNATURE_LENGTH {
        warn!(
            signature_length = claimed.len(),
            "rejecting signature with unexpected length"
        );
        return false;
    }

    if !is_hex(claimed) {
        warn!("rejecting signature with non-hex characters");
        return false;
    }

    let decoded = match hex::decode(claimed) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("failed to decode signature hex: {}", err);
            return false;
        }
    };

    let expected = hmac_sha256(payload.as_bytes(), secret.as_bytes());
    constant_time_eq(&decoded, &expected)
}

/// Configuration for [`is_valid_signature_detailed`]
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Accept an empty payload (default: reject before crypto runs)
    pub allow_empty_payload: bool,
    /// Reject payloads larger than this many bytes before crypto runs
    pub max_payload_size: usize,
    /// Emit a diagnostic record for every validation
    pub log_validation: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            allow_empty_payload: false,
            max_payload_size: DEFAULT_MAX_PAYLOAD_BYTES,
            log_validation: false,
        }
    }
}

/// Audit data for a validation that reached the compute-and-compare step.
///
/// Carries everything an operator needs to diagnose a mismatch. The secret
/// itself is never included.
#[derive(Debug, Clone)]
pub struct ValidationDetails {
    pub expected_signature: String,
    pub received_signature: String,
    pub payload_length: usize,
}

/// Outcome of a detailed signature validation
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    /// Set when a structural pre-check rejected the input
    pub error: Option<String>,
    /// Set once the HMAC compute-and-compare actually ran
    pub details: Option<ValidationDetails>,
}

impl ValidationOutcome {
    fn rejected(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            details: None,
        }
    }
}

/// Verify a signature with enumerated options and audit details.
///
/// Pre-checks run in a fixed order, each one before any crypto: empty
/// signature, empty secret, empty payload (unless allowed), oversized
/// payload, non-hex signature. Only after all pre-checks pass does the HMAC
/// compute-and-compare run; at that point `details` is always populated so
/// mismatches can be audit-logged.
pub fn is_valid_signature_detailed(
    payload: &str,
    claimed: &str,
    secret: &str,
    options: &ValidationOptions,
) -> ValidationOutcome {
    if claimed.is_empty() {
        return ValidationOutcome::rejected("Signature cannot be empty");
    }

    if secret.is_empty() {
        return ValidationOutcome::rejected("Secret cannot be empty");
    }

    if payload.is_empty() && !options.allow_empty_payload {
        return ValidationOutcome::rejected("Payload cannot be empty");
    }

    if payload.len() > options.max_payload_size {
        return ValidationOutcome::rejected(format!(
            "Payload exceeds maximum size of {} bytes",
            options.max_payload_size
        ));
    }

    if !is_hex(claimed) {
        return ValidationOutcome::rejected("Invalid signature format - must be hexadecimal");
    }

    let expected = hmac_sha256(payload.as_bytes(), secret.as_bytes());

    // hex::decode also rejects odd-length input, which the charset check
    // above does not catch
    let is_valid = hex::decode(claimed)
        .map(|decoded| constant_time_eq(&decoded, &expected))
        .unwrap_or(false);

    if options.log_validation {
        debug!(
            is_valid,
            payload_length = payload.len(),
            signature_length = claimed.len(),
            "webhook signature validation"
        );
    }

    ValidationOutcome {
        is_valid,
        error: None,
        details: Some(ValidationDetails {
            expected_signature: hex::encode(&expected),
            received_signature: claimed.to_string(),
            payload_length: payload.len(),
        }),
    }
}

/// A header value as it appears in a loosely typed header map
#[derive(Debug, Clone)]
pub enum RawHeaderValue {
    Single(String),
    Multi(Vec<String>),
}

/// Inbound webhook headers.
///
/// Handlers running behind axum have a typed `http::HeaderMap`; deliveries
/// replayed from logs or test fixtures arrive as a plain string map whose
/// values may be a single string or an array of strings.
pub enum WebhookHeaders<'a> {
    Typed(&'a http::HeaderMap),
    Raw(&'a HashMap<String, RawHeaderValue>),
}

/// Read the provider signature from the `verif-hash` header.
///
/// Returns `None` when the header is absent, or when its value fails the
/// hex-format check (logging a warning with the malformed value). For array
/// values the first element is used.
pub fn extract_signature(headers: WebhookHeaders<'_>) -> Option<String> {
    let value = match headers {
        WebhookHeaders::Typed(map) => map
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        WebhookHeaders::Raw(map) => map
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(SIGNATURE_HEADER))
            .and_then(|(_, value)| match value {
                RawHeaderValue::Single(s) => Some(s.clone()),
                RawHeaderValue::Multi(values) => values.first().cloned(),
            }),
    }?;

    if !is_hex(&value) {
        warn!(value = %value, "discarding malformed webhook signature header");
        return None;
    }

    Some(value)
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
