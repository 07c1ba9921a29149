//! # volt-backend
//!
//! Client for the platform backend consumed by the voltgate payment edge.
//!
//! The backend is a black box with two endpoints the edge talks to:
//! `POST {base}/payment/initiate` and `POST {base}/payment/webhook`. This
//! crate owns the base-URL configuration, the HTTP client, and the
//! re-validation of the backend's success contract at the edge.

pub mod client;
pub mod config;

// Re-exports
pub use client::{
    BackendClient, DELIVERY_ID_HEADER, SIGNATURE_VERIFIED_HEADER, USER_ID_HEADER,
    WEBHOOK_SOURCE, WEBHOOK_SOURCE_HEADER,
};
pub use config::{BackendConfig, DEFAULT_BACKEND_BASE_URL};
