use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::models::CheckResponse;

/// Error code attached to every caller-side authentication failure.
pub const SATELLITE_UNAUTHORIZED_ERROR: &str = "SATELLITE_UNAUTHORIZED_ERROR";

/// Typed failure categories a provider adapter returns to signal a specific
/// upstream failure mode.
///
/// Every adapter operation that fails because of the provider must fail with
/// exactly one of these variants, so the handler layer can map the outcome
/// deterministically. Each variant carries the raw upstream detail and fixes
/// a stable error code.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Malformed or invalid input rejected by the provider.
    BadRequest(String),
    /// Upstream did not respond in time.
    Timeout(String),
    /// Credential rejected by the provider.
    Unauthorized(String),
    /// Authenticated but not permitted.
    Forbidden(String),
    /// Referenced check or candidate absent upstream.
    NotFound(String),
    /// Semantically invalid payload.
    UnprocessableEntity(String),
    /// Upstream outage.
    ServiceUnavailable(String),
}

impl ProviderError {
    /// Stable machine-readable code for this failure category.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::BadRequest(_) => "PROVIDER_BAD_REQUEST_ERROR",
            ProviderError::Timeout(_) => "PROVIDER_TIMEOUT_ERROR",
            ProviderError::Unauthorized(_) => "PROVIDER_UNAUTHORIZED_ERROR",
            ProviderError::Forbidden(_) => "PROVIDER_FORBIDDEN_ERROR",
            ProviderError::NotFound(_) => "PROVIDER_NOT_FOUND_ERROR",
            ProviderError::UnprocessableEntity(_) => "PROVIDER_UNPROCESSABLE_ENTITY_ERROR",
            ProviderError::ServiceUnavailable(_) => "PROVIDER_SERVICE_UNAVAILABLE_ERROR",
        }
    }

    /// Raw upstream detail carried by this failure.
    pub fn error_message(&self) -> &str {
        match self {
            ProviderError::BadRequest(msg)
            | ProviderError::Timeout(msg)
            | ProviderError::Unauthorized(msg)
            | ProviderError::Forbidden(msg)
            | ProviderError::NotFound(msg)
            | ProviderError::UnprocessableEntity(msg)
            | ProviderError::ServiceUnavailable(msg) => msg,
        }
    }

    /// HTTP status returned to the caller for this failure category.
    ///
    /// Uniform mapping policy: the status mirrors the semantic failure
    /// category instead of collapsing every provider failure to one code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProviderError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProviderError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ProviderError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ProviderError::Forbidden(_) => StatusCode::FORBIDDEN,
            ProviderError::NotFound(_) => StatusCode::NOT_FOUND,
            ProviderError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProviderError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.error_message())
    }
}

impl std::error::Error for ProviderError {}

/// Caller-side authentication failure: the satellite service calling this
/// facade presented a wrong or missing shared secret.
///
/// Deliberately a separate type from [`ProviderError`] so a rejected caller
/// can never be confused with a provider-side `Unauthorized`.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteUnauthorized {
    pub message: String,
}

impl SatelliteUnauthorized {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SatelliteUnauthorized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", SATELLITE_UNAUTHORIZED_ERROR, self.message)
    }
}

impl std::error::Error for SatelliteUnauthorized {}

impl IntoResponse for SatelliteUnauthorized {
    /// Always HTTP 403 with the normalized failure body, independent of
    /// endpoint.
    fn into_response(self) -> Response {
        tracing::warn!("satellite request rejected: {}", self.message);
        let body = CheckResponse::failed(SATELLITE_UNAUTHORIZED_ERROR, self.message, None);
        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}
