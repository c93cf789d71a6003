use crate::adapter::BackgroundCheckAdapter;
use crate::errors::ProviderError;
use crate::handlers::constant_time_compare;
use crate::models::{CheckData, CheckResponse};
use crate::webhook_models::ProviderWebhookEvent;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// Adapter for background-check providers exposing a conventional REST API:
/// checks are created with `POST /v1/checks`, polled with
/// `GET /v1/checks/{id}`, and the provider pushes status changes to our
/// webhook endpoint.
///
/// Request translation is split into pure functions
/// ([`create_check_request`], [`response_to_check`]) so the HTTP glue here
/// stays thin.
#[derive(Clone)]
pub struct RestProviderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    webhook_secret: Option<String>,
}

impl RestProviderClient {
    /// Creates a new `RestProviderClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the provider API.
    /// * `api_key` - The bearer token for provider authentication.
    /// * `webhook_secret` - Optional shared secret for webhook callbacks;
    ///   when unset, webhook token verification is skipped.
    pub fn new(
        base_url: String,
        api_key: String,
        webhook_secret: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create provider client: {}", e))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            webhook_secret,
        })
    }

    async fn send_check_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ProviderError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status_error(status, error_text));
        }

        response.json().await.map_err(|e| {
            ProviderError::ServiceUnavailable(format!("Failed to parse provider response: {}", e))
        })
    }
}

#[async_trait]
impl BackgroundCheckAdapter for RestProviderClient {
    fn name(&self) -> &'static str {
        "rest_provider"
    }

    async fn create_check(&self, data: &CheckData) -> Result<CheckResponse, ProviderError> {
        let body = create_check_request(data)?;
        let url = format!("{}/v1/checks", self.base_url);
        tracing::info!(
            "Creating background check for {} at {}",
            data.correlation_id().unwrap_or_default(),
            url
        );

        let raw = self
            .send_check_request(self.client.post(&url).json(&body))
            .await?;
        Ok(response_to_check(&raw, data))
    }

    async fn get_check(&self, data: &CheckData) -> Result<CheckResponse, ProviderError> {
        let id = data.correlation_id().ok_or_else(|| {
            ProviderError::BadRequest(
                "missing correlation key (external_id or candidate_id)".to_string(),
            )
        })?;
        let url = format!("{}/v1/checks/{}", self.base_url, id);
        tracing::info!("Fetching background check {} from provider", id);

        let raw = self.send_check_request(self.client.get(&url)).await?;
        Ok(response_to_check(&raw, data))
    }

    async fn register_webhook_event(&self, headers: &HeaderMap, body: Bytes) -> StatusCode {
        if let Some(ref secret) = self.webhook_secret {
            let token = headers
                .get("X-Webhook-Token")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if !constant_time_compare(token, secret) {
                tracing::warn!("rejected provider webhook with invalid token");
                return StatusCode::UNAUTHORIZED;
            }
        }

        match serde_json::from_slice::<ProviderWebhookEvent>(&body) {
            Ok(event) => {
                tracing::info!(
                    provider = self.name(),
                    correlation_id = event.correlation_id().unwrap_or_default(),
                    status = event.status.as_deref().unwrap_or_default(),
                    "provider webhook event received"
                );
                StatusCode::OK
            }
            Err(e) => {
                tracing::warn!("discarding malformed provider webhook: {}", e);
                StatusCode::BAD_REQUEST
            }
        }
    }

    async fn external_service_is_healthy(&self) -> bool {
        let url = format!("{}/v1/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("provider health probe failed: {}", e);
                false
            }
        }
    }
}

/// Builds the provider request body for check creation. Pure, no I/O.
///
/// Validates this adapter's required subset of [`CheckData`]: first name,
/// last name, email and a correlation key. Optional fields are forwarded
/// only when present, never defaulted.
pub fn create_check_request(data: &CheckData) -> Result<Value, ProviderError> {
    let external_id = data.correlation_id().ok_or_else(|| {
        ProviderError::BadRequest(
            "missing correlation key (external_id or candidate_id)".to_string(),
        )
    })?;
    let first_name = require_field(data.first_name.as_deref(), "first_name")?;
    let last_name = require_field(data.last_name.as_deref(), "last_name")?;
    let email = require_field(data.email.as_deref(), "email")?;

    let mut body = serde_json::Map::new();
    body.insert("external_id".to_string(), json!(external_id));
    body.insert("first_name".to_string(), json!(first_name));
    body.insert("last_name".to_string(), json!(last_name));
    body.insert("email".to_string(), json!(email));

    if let Some(ref middle_names) = data.middle_names {
        body.insert("middle_names".to_string(), json!(middle_names));
    }
    if let Some(no_middle_name) = data.no_middle_name {
        body.insert("no_middle_name".to_string(), json!(no_middle_name));
    }
    if let Some(birthdate) = data.birthdate {
        body.insert("birthdate".to_string(), json!(birthdate));
    }
    if let Some(ref dni) = data.dni {
        body.insert("dni".to_string(), json!(dni));
    }
    if let Some(ref ssn) = data.social_security_number {
        body.insert("social_security_number".to_string(), json!(ssn));
    }
    if let Some(ref sin) = data.social_identification_number {
        body.insert("social_identification_number".to_string(), json!(sin));
    }
    if let Some(ref zip_code) = data.zip_code {
        body.insert("zip_code".to_string(), json!(zip_code));
    }
    if let Some(ref number) = data.driver_license_number {
        body.insert("driver_license_number".to_string(), json!(number));
    }
    if let Some(ref state) = data.driver_license_state {
        body.insert("driver_license_state".to_string(), json!(state));
    }
    if let Some(ref category) = data.driver_license_category {
        body.insert("driver_license_category".to_string(), json!(category));
    }
    if let Some(expiration) = data.driver_license_expiration_date {
        body.insert("driver_license_expiration_date".to_string(), json!(expiration));
    }
    if let Some(ref phone) = data.phone {
        body.insert("phone".to_string(), json!(phone));
    }
    if let Some(ref state_code) = data.state_code {
        body.insert("state_code".to_string(), json!(state_code));
    }
    if let Some(ref country_code) = data.country_code {
        body.insert("country_code".to_string(), json!(country_code));
    }
    if let Some(ref city_name) = data.city_name {
        body.insert("city_name".to_string(), json!(city_name));
    }
    if let Some(ref city_code) = data.city_code {
        body.insert("city_code".to_string(), json!(city_code));
    }
    if let Some(ref transportation) = data.transportation {
        body.insert("transportation".to_string(), json!(transportation));
    }
    if let Some(ref start_url) = data.start_url {
        body.insert("start_url".to_string(), json!(start_url));
    }
    if let Some(ref mothers_name) = data.mothers_name {
        body.insert("mothers_name".to_string(), json!(mothers_name));
    }
    if let Some(ref city_of_birth) = data.city_of_birth {
        body.insert("city_of_birth".to_string(), json!(city_of_birth));
    }
    if let Some(ref country_of_birth) = data.country_of_birth {
        body.insert("country_of_birth".to_string(), json!(country_of_birth));
    }

    Ok(Value::Object(body))
}

/// Translates a raw provider response into the normalized shape. Pure, no I/O.
///
/// The caller-supplied correlation key wins over whatever the provider
/// echoes; provider-specific fields are preserved opaquely under `metadata`.
pub fn response_to_check(raw: &Value, data: &CheckData) -> CheckResponse {
    let status = raw
        .get("status")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let external_id = data
        .correlation_id()
        .map(str::to_string)
        .or_else(|| {
            raw.get("external_id")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        });
    let metadata = match raw.get("metadata") {
        Some(metadata) if !metadata.is_null() => Some(metadata.clone()),
        _ => Some(raw.clone()),
    };

    CheckResponse {
        status,
        external_id,
        metadata,
        error_details: None,
    }
}

fn require_field<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ProviderError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProviderError::BadRequest(format!(
            "missing required field: {}",
            name
        ))),
    }
}

/// Maps an upstream HTTP status to the matching taxonomy variant, preserving
/// the response body verbatim as the error message.
fn map_status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    match status {
        reqwest::StatusCode::BAD_REQUEST => ProviderError::BadRequest(body),
        reqwest::StatusCode::REQUEST_TIMEOUT => ProviderError::Timeout(body),
        reqwest::StatusCode::UNAUTHORIZED => ProviderError::Unauthorized(body),
        reqwest::StatusCode::FORBIDDEN => ProviderError::Forbidden(body),
        reqwest::StatusCode::NOT_FOUND => ProviderError::NotFound(body),
        reqwest::StatusCode::UNPROCESSABLE_ENTITY => ProviderError::UnprocessableEntity(body),
        s if s.is_server_error() => ProviderError::ServiceUnavailable(body),
        _ => ProviderError::BadRequest(body),
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(format!("provider request timed out: {}", e))
    } else {
        ProviderError::ServiceUnavailable(format!("provider request failed: {}", e))
    }
}
