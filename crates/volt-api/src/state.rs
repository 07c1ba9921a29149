//! # Application State
//!
//! Shared state for the Axum application. Both handlers are stateless
//! per-request; the state only carries configuration and the backend client.

use tracing::warn;
use volt_backend::BackendClient;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Shared secret the provider signs webhooks with.
    ///
    /// Deliberately optional at startup: a missing secret is reported
    /// per-request as a configuration error on the webhook path, so a bad
    /// deployment is visible in the error taxonomy instead of crashing the
    /// whole edge.
    pub secret_hash: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let secret_hash = std::env::var("FLW_SECRET_HASH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            secret_hash,
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Client for the platform backend
    pub backend: BackendClient,
}

impl AppState {
    /// Create a new AppState from the environment
    pub fn new() -> Self {
        let config = AppConfig::from_env();

        if config.secret_hash.is_none() {
            warn!("FLW_SECRET_HASH is not set; webhook deliveries will be rejected with a configuration error");
        }

        Self {
            config,
            backend: BackendClient::from_env(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
