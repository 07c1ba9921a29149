//! # volt-api
//!
//! HTTP edge layer for the voltgate payment platform.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Webhook receiver with HMAC signature verification
//! - Payment initiation proxy to the platform backend
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/payment/initiate` | Start a payment (proxied to backend) |
//! | POST | `/api/payment/webhook` | Flutterwave webhook intake |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
