//! The response envelope shared by every backend endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error produced when unwrapping an [`ApiResponse`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend reported `success: false`. Carries the most specific
    /// error text the envelope offered.
    #[error("{0}")]
    Rejected(String),
    /// The backend reported success but omitted a payload the caller
    /// requires.
    #[error("Empty response data")]
    MissingData,
}

/// Marker for endpoints whose `data` payload carries no information.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Empty;

/// Standard backend envelope: `{ success, message, data, errors }`.
///
/// `errors` is deliberately loose — the backend emits either an object
/// with a `detail` field, a bare message, or null depending on the
/// failure.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl<T> ApiResponse<T> {
    /// Error text precedence: `errors.detail`, then `message`, then a
    /// generic fallback.
    pub fn error_text(&self) -> String {
        if let Some(detail) = self
            .errors
            .as_ref()
            .and_then(|errors| errors.get("detail"))
            .and_then(Value::as_str)
        {
            return detail.to_owned();
        }
        if !self.message.is_empty() {
            return self.message.clone();
        }
        "Request failed".to_owned()
    }

    /// Unwrap the envelope, keeping an absent payload as `None`.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected(self.error_text()))
        }
    }

    /// Unwrap the envelope, requiring a payload.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.into_result()?.ok_or(ApiError::MissingData)
    }

    /// Unwrap the envelope, substituting the default for an absent
    /// payload (list endpoints return `data: null` when empty).
    pub fn into_data_or_default(self) -> Result<T, ApiError>
    where
        T: Default,
    {
        Ok(self.into_result()?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(success: bool, message: &str, errors: Option<Value>) -> ApiResponse<Vec<u32>> {
        ApiResponse {
            success,
            message: message.to_owned(),
            data: None,
            errors,
        }
    }

    #[test]
    fn detail_takes_precedence_over_message() {
        let res = envelope(false, "outer message", Some(json!({"detail": "inner detail"})));
        assert_eq!(res.error_text(), "inner detail");
    }

    #[test]
    fn message_used_when_detail_absent() {
        let res = envelope(false, "outer message", Some(json!({"code": 7})));
        assert_eq!(res.error_text(), "outer message");
    }

    #[test]
    fn generic_fallback_when_envelope_is_bare() {
        let res = envelope(false, "", None);
        assert_eq!(res.error_text(), "Request failed");
    }

    #[test]
    fn missing_required_payload_is_an_error() {
        let res = envelope(true, "ok", None);
        assert!(matches!(res.into_data(), Err(ApiError::MissingData)));
    }

    #[test]
    fn absent_list_payload_defaults_to_empty() {
        let res = envelope(true, "ok", None);
        assert_eq!(res.into_data_or_default().unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn rejected_envelope_fails_even_with_payload() {
        let res = ApiResponse {
            success: false,
            message: "nope".to_owned(),
            data: Some(vec![1]),
            errors: None,
        };
        assert!(matches!(res.into_result(), Err(ApiError::Rejected(text)) if text == "nope"));
    }
}
