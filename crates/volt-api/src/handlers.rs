//! # Request Handlers
//!
//! Axum request handlers for the payment edge. Two contracts live here: the
//! webhook receiver (verify-then-ack, forward decoupled from the response)
//! and the payment initiation proxy (validate, forward, re-validate the
//! backend's answer).

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use volt_backend::USER_ID_HEADER;
use volt_core::{
    extract_signature, is_valid_signature, validate_amount, EdgeError, InitiateResult,
    WebhookHeaders, WebhookSummary,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Uniform error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }

    /// Envelope with the taxonomy tag only (no message)
    pub fn tag_only(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// Acknowledgement sent to the provider once a delivery is verified
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
    pub message: &'static str,
}

impl WebhookAck {
    fn received() -> Self {
        Self {
            status: "success",
            message: "Webhook received and verified successfully",
        }
    }
}

fn edge_error_to_response(err: EdgeError) -> (StatusCode, Json<ErrorBody>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorBody::new(err.error_tag(), err.to_string());
    (status, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "voltgate",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handle a Flutterwave webhook delivery.
///
/// The signature is verified against the exact bytes received, before any
/// JSON parsing, so tampering that preserves JSON semantics is still
/// rejected. Once signature and JSON are valid the handler commits to a
/// `200`; the backend forward runs as a detached task and its outcome never
/// reaches the provider, which would otherwise retry and eventually disable
/// the webhook on repeated timeouts.
#[instrument(skip(state, headers, body))]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, Json<ErrorBody>)> {
    let signature = extract_signature(WebhookHeaders::Typed(&headers)).ok_or_else(|| {
        edge_error_to_response(EdgeError::BadRequest(
            "Webhook signature is required".to_string(),
        ))
    })?;

    let secret = state.config.secret_hash.clone().ok_or_else(|| {
        error!("webhook received but FLW_SECRET_HASH is not configured");
        edge_error_to_response(EdgeError::Configuration(
            "Webhook configuration error".to_string(),
        ))
    })?;

    // Webhook bodies are JSON, so a non-UTF-8 body can never parse
    let raw = std::str::from_utf8(&body).map_err(|_| {
        edge_error_to_response(EdgeError::BadRequest("Invalid JSON payload".to_string()))
    })?;

    if !is_valid_signature(raw, &signature, &secret) {
        warn!("webhook signature mismatch");
        return Err(edge_error_to_response(EdgeError::Unauthorized(
            "Invalid webhook signature".to_string(),
        )));
    }

    let payload: Value = serde_json::from_str(raw).map_err(|_| {
        edge_error_to_response(EdgeError::BadRequest("Invalid JSON payload".to_string()))
    })?;

    let summary = WebhookSummary::from_payload(&payload);
    info!(
        event = summary.event.as_deref().unwrap_or("unknown"),
        tx_ref = summary.tx_ref.as_deref().unwrap_or("unknown"),
        status = summary.status.as_deref().unwrap_or("unknown"),
        amount = ?summary.amount,
        "webhook verified"
    );

    // Fire-and-forget: the provider gets its 200 regardless of the forward
    // outcome. One attempt only; redelivery is the provider's policy.
    let backend = state.backend.clone();
    let delivery_id = Uuid::new_v4();
    tokio::spawn(async move {
        if let Err(err) = backend.forward_webhook(&payload, delivery_id).await {
            error!(%delivery_id, "webhook forward failed: {}", err);
        }
    });

    Ok(Json(WebhookAck::received()))
}

/// 405 for non-POST requests to the webhook endpoint
pub async fn webhook_method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    edge_error_to_response(EdgeError::MethodNotAllowed(
        "Only POST method is allowed for webhook endpoint".to_string(),
    ))
}

/// Proxy a payment initiation to the platform backend.
///
/// Identity comes from trusted headers, never the body. The raw body is
/// parsed by hand because a malformed body on this path has historically
/// been reported as a 500, not a 400, and clients depend on that.
#[instrument(skip(state, headers, body))]
pub async fn initiate_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InitiateResult>, (StatusCode, Json<ErrorBody>)> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            edge_error_to_response(EdgeError::Authentication(
                "User ID not found in request headers".to_string(),
            ))
        })?;

    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            edge_error_to_response(EdgeError::Authentication(
                "Access token not found in request headers".to_string(),
            ))
        })?;

    let payload: Value = serde_json::from_slice(&body).map_err(|err| {
        error!("unreadable initiation body: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::tag_only("Internal Server Error")),
        )
    })?;

    let amount = validate_amount(payload.get("amount")).map_err(edge_error_to_response)?;

    let result = state
        .backend
        .initiate_payment(amount, user_id, authorization)
        .await
        .map_err(|err| {
            error!("payment initiation failed: {}", err);
            edge_error_to_response(err)
        })?;

    Ok(Json(result))
}

/// 405 for non-POST requests to the initiate endpoint
pub async fn initiate_method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    edge_error_to_response(EdgeError::MethodNotAllowed(
        "Only POST method is allowed".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::state::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use volt_backend::{BackendClient, BackendConfig};
    use volt_core::generate_signature;
    use wiremock::matchers::{method as wm_method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "flw-test-secret-hash";

    /// Backend address for tests that must never reach the backend
    const DEAD_BACKEND: &str = "http://127.0.0.1:1";

    fn state_with(secret: Option<&str>, backend_url: &str) -> AppState {
        AppState {
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
                secret_hash: secret.map(String::from),
            },
            backend: BackendClient::new(BackendConfig::new(backend_url)),
        }
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/payment/webhook")
            .header("content-type", "application/json");
        if let Some(sig) = signature {
            builder = builder.header("verif-hash", sig);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn initiate_request(
        body: &str,
        user_id: Option<&str>,
        token: Option<&str>,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/payment/initiate")
            .header("content-type", "application/json");
        if let Some(id) = user_id {
            builder = builder.header("x-user-id", id);
        }
        if let Some(token) = token {
            builder = builder.header("authorization", token);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    // ------------------------------------------------------------------
    // Webhook receiver
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_webhook_missing_signature() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(state, webhook_request(r#"{"event":"x"}"#, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "Webhook signature is required");
    }

    #[tokio::test]
    async fn test_webhook_wrong_signature() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let payload = r#"{"event":"charge.completed"}"#;
        // Well-formed signature computed under a different secret
        let wrong = generate_signature(payload, "not-the-secret");
        let (status, body) = send(state, webhook_request(payload, Some(&wrong))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["message"], "Invalid webhook signature");
    }

    #[tokio::test]
    async fn test_webhook_unconfigured_secret_is_a_server_fault() {
        let state = state_with(None, DEAD_BACKEND);
        let payload = r#"{"event":"charge.completed"}"#;
        let sig = generate_signature(payload, SECRET);
        let (status, body) = send(state, webhook_request(payload, Some(&sig))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "Webhook configuration error");
    }

    #[tokio::test]
    async fn test_webhook_invalid_json_after_valid_signature() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let payload = "not json at all";
        let sig = generate_signature(payload, SECRET);
        let (status, body) = send(state, webhook_request(payload, Some(&sig))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "Invalid JSON payload");
    }

    #[tokio::test]
    async fn test_webhook_acks_even_when_backend_forward_fails() {
        let server = MockServer::start().await;
        Mock::given(wm_method("POST"))
            .and(path("/payment/webhook"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let state = state_with(Some(SECRET), &server.uri());
        let payload = r#"{"event":"charge.completed","data":{"tx_ref":"vg-1","status":"successful","amount":2500}}"#;
        let sig = generate_signature(payload, SECRET);
        let (status, body) = send(state, webhook_request(payload, Some(&sig))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Webhook received and verified successfully");
    }

    #[tokio::test]
    async fn test_webhook_rejects_byte_level_tampering() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let signed = r#"{"amount":100}"#;
        let sig = generate_signature(signed, SECRET);
        // Same JSON semantics, different bytes
        let tampered = r#"{ "amount": 100 }"#;
        let (status, _) = send(state, webhook_request(tampered, Some(&sig))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_get_is_method_not_allowed() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let request = Request::builder()
            .method("GET")
            .uri("/api/payment/webhook")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method Not Allowed");
        assert_eq!(
            body["message"],
            "Only POST method is allowed for webhook endpoint"
        );
    }

    // ------------------------------------------------------------------
    // Payment initiation proxy
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_initiate_missing_user_id() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":100}"#, None, Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication Error");
        assert_eq!(body["message"], "User ID not found in request headers");
    }

    #[tokio::test]
    async fn test_initiate_missing_token() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":100}"#, Some("user-42"), None),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication Error");
        assert_eq!(body["message"], "Access token not found in request headers");
    }

    #[tokio::test]
    async fn test_initiate_zero_amount() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":0}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation Error");
        assert_eq!(body["message"], "Minimum amount is 1");
    }

    #[tokio::test]
    async fn test_initiate_negative_amount() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":-10}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Amount must be positive");
    }

    #[tokio::test]
    async fn test_initiate_missing_amount() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request(r#"{}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "amount is required");
    }

    #[tokio::test]
    async fn test_initiate_non_numeric_amount() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":"100"}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Amount must be a valid number");
    }

    #[tokio::test]
    async fn test_initiate_malformed_json_is_internal_error() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request("{not json", Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_initiate_success() {
        let server = MockServer::start().await;
        Mock::given(wm_method("POST"))
            .and(path("/payment/initiate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentLink": "https://checkout.flutterwave.com/pay/abc",
                "txRef": "vg-1700000000"
            })))
            .mount(&server)
            .await;

        let state = state_with(Some(SECRET), &server.uri());
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":500}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paymentLink"], "https://checkout.flutterwave.com/pay/abc");
        assert_eq!(body["txRef"], "vg-1700000000");
    }

    #[tokio::test]
    async fn test_initiate_backend_success_missing_tx_ref_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(wm_method("POST"))
            .and(path("/payment/initiate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentLink": "https://checkout.flutterwave.com/pay/abc"
            })))
            .mount(&server)
            .await;

        let state = state_with(Some(SECRET), &server.uri());
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":500}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Backend Error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Missing required fields"));
    }

    #[tokio::test]
    async fn test_initiate_backend_rejection_passes_through() {
        let server = MockServer::start().await;
        Mock::given(wm_method("POST"))
            .and(path("/payment/initiate"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "Account suspended"
            })))
            .mount(&server)
            .await;

        let state = state_with(Some(SECRET), &server.uri());
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":500}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Backend Error");
        assert_eq!(body["message"], "Account suspended");
    }

    #[tokio::test]
    async fn test_initiate_unreachable_backend_is_internal() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let (status, body) = send(
            state,
            initiate_request(r#"{"amount":500}"#, Some("user-42"), Some("Bearer tok")),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Backend Error");
    }

    #[tokio::test]
    async fn test_initiate_get_is_method_not_allowed() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let request = Request::builder()
            .method("GET")
            .uri("/api/payment/initiate")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method Not Allowed");
        assert_eq!(body["message"], "Only POST method is allowed");
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_health() {
        let state = state_with(Some(SECRET), DEAD_BACKEND);
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "voltgate");
    }
}
