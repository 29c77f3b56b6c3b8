//! The uniform `{success, message, responseObject, statusCode}` wrapper.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Usually null when `success` is false
    pub response_object: Option<T>,
    #[serde(default)]
    pub status_code: u16,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            response_object: Some(payload),
            status_code: 200,
        }
    }

    pub fn failure(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            response_object: None,
            status_code,
        }
    }

    /// The payload of a successful envelope.
    ///
    /// A `success: true` envelope without a payload is reported as a failure
    /// carrying the envelope message.
    pub fn into_payload(self) -> Result<T, String> {
        match (self.success, self.response_object) {
            (true, Some(payload)) => Ok(payload),
            (true, None) => Err(if self.message.is_empty() {
                "response had no payload".to_string()
            } else {
                self.message
            }),
            (false, _) => Err(self.message),
        }
    }
}

/// `responseObject` of `POST /etl/integrate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStarted {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_time: String,
}

/// `responseObject` of `GET /health-check`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}
