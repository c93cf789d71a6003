use crate::adapter::BackgroundCheckAdapter;
use crate::config::Config;
use crate::errors::{ProviderError, SatelliteUnauthorized};
use crate::models::{CheckData, CheckResponse};
use crate::webhook_models::WebhookAck;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Holds the single adapter instance selected at process start; the handler
/// layer itself keeps no mutable state between requests.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The provider integration behind this facade.
    pub adapter: Arc<dyn BackgroundCheckAdapter>,
}

/// Validates the caller-supplied `Authorization` header.
///
/// The header value is `base64(shared_secret)`; it is decoded and compared
/// as UTF-8 text against the configured secret. Missing header, invalid
/// base64, invalid UTF-8, and mismatch are all rejected the same way.
pub fn authorize_satellite(
    authorization: Option<&str>,
    expected_password: &str,
) -> Result<(), SatelliteUnauthorized> {
    let signature =
        authorization.ok_or_else(|| SatelliteUnauthorized::new("Satellite unauthorized"))?;

    let decoded = BASE64
        .decode(signature)
        .map_err(|_| SatelliteUnauthorized::new("Satellite unauthorized"))?;
    let password = String::from_utf8(decoded)
        .map_err(|_| SatelliteUnauthorized::new("Satellite unauthorized"))?;

    if !constant_time_compare(&password, expected_password) {
        return Err(SatelliteUnauthorized::new("Satellite unauthorized"));
    }

    Ok(())
}

/// Constant-time string comparison to prevent timing attacks.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get("Authorization").and_then(|v| v.to_str().ok())
}

/// Decodes the request body into [`CheckData`].
///
/// A JSON parse failure is surfaced as a clean 400 with an `{"error": ...}`
/// body rather than a generic server error; it is never swallowed.
fn parse_check_data(body: &Bytes) -> Result<CheckData, Response> {
    serde_json::from_slice::<CheckData>(body).map_err(|e| {
        tracing::warn!("rejected malformed check payload: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Invalid request body: {}", e) })),
        )
            .into_response()
    })
}

/// Logs a recovered provider failure with structured context.
///
/// The upstream detail is decoded as JSON when it parses, otherwise logged
/// raw, mirroring what is sent to the error-reporting sink.
fn log_provider_failure(provider: &str, data: &CheckData, error: &ProviderError) {
    let detail = serde_json::from_str::<Value>(error.error_message())
        .unwrap_or_else(|_| Value::String(error.error_message().to_string()));
    tracing::info!(
        provider,
        shopper_email = data.email.as_deref().unwrap_or_default(),
        error_code = error.error_code(),
        %detail,
        "background check request failed"
    );
}

/// Maps an adapter outcome to the HTTP response for both check endpoints.
fn provider_outcome_response(
    state: &AppState,
    data: &CheckData,
    outcome: Result<CheckResponse, ProviderError>,
) -> Response {
    match outcome {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => {
            log_provider_failure(state.adapter.name(), data, &error);
            let body = CheckResponse::failed(
                error.error_code(),
                error.error_message().to_string(),
                data.external_id.clone(),
            );
            (error.status_code(), Json(body)).into_response()
        }
    }
}

/// POST /create_check
///
/// Authenticates the caller, parses the body into [`CheckData`], dispatches
/// to the adapter and normalizes the outcome. Authentication runs on the raw
/// request, before any body parsing.
pub async fn create_check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = authorize_satellite(authorization_header(&headers), &state.config.request_password)
    {
        return e.into_response();
    }

    let data = match parse_check_data(&body) {
        Ok(data) => data,
        Err(response) => return response,
    };

    let outcome = state.adapter.create_check(&data).await;
    provider_outcome_response(&state, &data, outcome)
}

/// POST /get_check
///
/// Same pipeline as `/create_check`, dispatching to the adapter's check
/// retrieval operation.
pub async fn get_check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = authorize_satellite(authorization_header(&headers), &state.config.request_password)
    {
        return e.into_response();
    }

    let data = match parse_check_data(&body) {
        Ok(data) => data,
        Err(response) => return response,
    };

    let outcome = state.adapter.get_check(&data).await;
    provider_outcome_response(&state, &data, outcome)
}

/// POST /webhook
///
/// No facade-side authentication and no parsing: the raw callback goes to
/// the adapter, whose provider-specific checks decide the status to echo.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let status = state.adapter.register_webhook_event(&headers, body).await;
    (
        status,
        Json(WebhookAck {
            success: status.is_success(),
        }),
    )
        .into_response()
}

/// GET /healthz — liveness only, no dependency checks.
pub async fn healthz() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({})))
}

/// GET /external_health — readiness of the upstream provider.
pub async fn external_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    if state.adapter.external_service_is_healthy().await {
        (StatusCode::OK, Json(json!({})))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
    }
}
