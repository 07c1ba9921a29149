//! # VoltGate
//!
//! Payment edge for the voltgate VTU platform.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export FLW_SECRET_HASH=...
//! export BACKEND_BASE_URL=https://backend.voltgate.io/api/v1
//!
//! # Run the server
//! voltgate
//! ```

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use volt_api::{routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Initialize application state
    let state = AppState::new();

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Backend: {}", state.backend.base_url());
    info!(
        "Webhook secret configured: {}",
        state.config.secret_hash.is_some()
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("⚡ VoltGate starting on http://{}", addr);

    if !is_prod {
        info!("💳 Initiate: POST http://{}/api/payment/initiate", addr);
        info!("🔔 Webhook:  POST http://{}/api/payment/webhook", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  ⚡ VoltGate ⚡
  ━━━━━━━━━━━━━━
  VTU payment edge
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
