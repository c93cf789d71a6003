use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status-change callback sent by the provider to `/webhook`.
///
/// Providers disagree on payload shape, so only the fields the facade logs
/// are modeled; everything else is preserved in the flattened raw tail.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderWebhookEvent {
    /// Correlation key the check was created with.
    #[serde(default)]
    pub external_id: Option<String>,

    /// Provider-side candidate identifier.
    #[serde(default)]
    pub candidate_id: Option<String>,

    /// New status reported by the provider (e.g. "COMPLETED", "CONSIDER").
    #[serde(default)]
    pub status: Option<String>,

    /// Raw data for any additional fields.
    #[serde(flatten)]
    pub raw: Value,
}

impl ProviderWebhookEvent {
    /// Correlation key of the event: `external_id` falling back to
    /// `candidate_id`.
    pub fn correlation_id(&self) -> Option<&str> {
        self.external_id.as_deref().or(self.candidate_id.as_deref())
    }
}

/// Body echoed to the provider from `/webhook`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
}
