//! # Backend Configuration
//!
//! Base-URL configuration for the platform backend. The fallback default is
//! a documented constant injected at startup rather than an inline literal
//! in the handlers.

use std::env;

/// Fallback used when `BACKEND_BASE_URL` is unset (local development stack)
pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:5000/api/v1";

/// Configuration for the platform backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL the payment endpoints hang off of, without a trailing slash
    pub base_url: String,
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `BACKEND_BASE_URL`, falling back to
    /// [`DEFAULT_BACKEND_BASE_URL`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let base_url = env::var("BACKEND_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_BASE_URL.to_string());

        Self::new(base_url)
    }

    /// Create config with an explicit base URL (for testing)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// URL of the backend's payment-initiate endpoint
    pub fn initiate_url(&self) -> String {
        format!("{}/payment/initiate", self.base_url)
    }

    /// URL of the backend's webhook intake endpoint
    pub fn webhook_url(&self) -> String {
        format!("{}/payment/webhook", self.base_url)
    }
}
