use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============ Check Request Model ============

/// The verification request payload accepted by `/create_check` and `/get_check`.
///
/// This struct is the superset of every field any provider integration may
/// need. All fields are optional; each adapter validates its own required
/// subset. Absent JSON keys deserialize to `None` and unrecognized keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckData {
    /// First name of the person being checked.
    pub first_name: Option<String>,
    /// Middle name(s), space separated.
    pub middle_names: Option<String>,
    /// Set when the person explicitly has no middle name.
    pub no_middle_name: Option<bool>,
    /// Last name of the person being checked.
    pub last_name: Option<String>,
    /// Contact email of the person being checked.
    pub email: Option<String>,
    /// National identity document number (DNI).
    pub dni: Option<String>,
    /// Date of birth (ISO `YYYY-MM-DD`).
    pub birthdate: Option<NaiveDate>,
    /// Social security number.
    pub social_security_number: Option<String>,
    /// Social identification number used by some countries instead of an SSN.
    pub social_identification_number: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Driver's license number.
    pub driver_license_number: Option<String>,
    /// State that issued the driver's license.
    pub driver_license_state: Option<String>,
    /// Driver's license category (e.g. "A", "B").
    pub driver_license_category: Option<String>,
    /// Driver's license expiration date (ISO `YYYY-MM-DD`).
    pub driver_license_expiration_date: Option<NaiveDate>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// State code of the residence address.
    pub state_code: Option<String>,
    /// Country code of the residence address.
    pub country_code: Option<String>,
    /// City name of the residence address.
    pub city_name: Option<String>,
    /// City code of the residence address.
    pub city_code: Option<String>,
    /// Transportation mode of the candidate (e.g. "car", "bicycle").
    pub transportation: Option<String>,
    /// Caller-supplied correlation key threaded through create -> webhook -> get.
    pub external_id: Option<String>,
    /// Redirect URL for providers with a hosted verification flow.
    pub start_url: Option<String>,
    /// Provider-side candidate identifier, alternative correlation key.
    pub candidate_id: Option<String>,
    /// Mother's full name, required by some providers.
    pub mothers_name: Option<String>,
    /// City of birth, required by some providers.
    pub city_of_birth: Option<String>,
    /// Country of birth, required by some providers.
    pub country_of_birth: Option<String>,
}

impl CheckData {
    /// Returns the correlation key for this request: `external_id` when
    /// present, otherwise `candidate_id`.
    pub fn correlation_id(&self) -> Option<&str> {
        self.external_id.as_deref().or(self.candidate_id.as_deref())
    }
}

// ============ Normalized Response Model ============

/// One normalized failure entry inside a [`CheckResponse`].
///
/// `code` is a stable machine-readable string callers can branch on.
/// `message` carries the upstream detail; provider JSON blobs are preserved
/// verbatim as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// The normalized result returned to the caller for both check operations.
///
/// Every field serializes even when absent (`null`), so callers always see
/// the same shape. Invariant: when `error_details` is non-empty, `status`
/// is `"FAILED"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Success or failure tag; provider-specific on success, `"FAILED"` on failure.
    pub status: Option<String>,
    /// Echo of the caller-supplied correlation key.
    pub external_id: Option<String>,
    /// Opaque provider-specific fields.
    pub metadata: Option<Value>,
    /// Normalized failure entries, absent on success.
    pub error_details: Option<Vec<ErrorDetail>>,
}

/// Status tag used on every normalized failure response.
pub const FAILED_STATUS: &str = "FAILED";

impl CheckResponse {
    /// Builds the normalized failure response carrying a single error detail.
    pub fn failed(
        code: impl Into<String>,
        message: impl Into<String>,
        external_id: Option<String>,
    ) -> Self {
        Self {
            status: Some(FAILED_STATUS.to_string()),
            external_id,
            metadata: None,
            error_details: Some(vec![ErrorDetail {
                code: code.into(),
                message: message.into(),
            }]),
        }
    }
}
