use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};

use crate::errors::ProviderError;
use crate::models::{CheckData, CheckResponse};

/// Capability set every background-check provider integration must implement.
///
/// The facade holds exactly one implementation per process, selected by the
/// deployment at startup and shared across all in-flight requests as
/// `Arc<dyn BackgroundCheckAdapter>`. Implementations must be safe for
/// concurrent use; any mutable state (connection pools, token refresh) is the
/// adapter's own concern.
#[async_trait]
pub trait BackgroundCheckAdapter: Send + Sync {
    /// Stable adapter identity, used only for structured logging.
    fn name(&self) -> &'static str;

    /// Initiates a verification with the provider.
    ///
    /// Returns a populated [`CheckResponse`] or exactly one
    /// [`ProviderError`] variant. Must not retry internally.
    async fn create_check(&self, data: &CheckData) -> Result<CheckResponse, ProviderError>;

    /// Fetches the current status of a previously created check, identified
    /// via the correlation key carried in `data`.
    ///
    /// Same failure contract as [`create_check`](Self::create_check).
    async fn get_check(&self, data: &CheckData) -> Result<CheckResponse, ProviderError>;

    /// Consumes an asynchronous callback from the provider and returns the
    /// HTTP status to echo back (200 = accepted; anything else tells the
    /// provider to retry or alert per its own policy).
    ///
    /// Signals failure only via the returned status code, never through the
    /// provider error taxonomy.
    async fn register_webhook_event(&self, headers: &HeaderMap, body: Bytes) -> StatusCode;

    /// Cheap liveness probe of the upstream provider.
    ///
    /// Any failure to determine health is reported as `false`.
    async fn external_service_is_healthy(&self) -> bool;
}
