//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod contacts;
mod scalar;
mod sms;

use serde::Deserialize;

use crate::domain::ErrorCode;

pub use contacts::{
    decode_contact_json_response, decode_group_json_response, encode_create_contact_form,
    encode_create_group_form,
};
pub use sms::{
    SmsForm, SmsListResponse, SmsTarget, decode_sms_list_json_response, encode_sms_form,
    order_by_recipients,
};

use scalar::TransportScalar;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("response contains invalid phone number: {value}")]
    InvalidPhoneNumber { value: String },

    #[error("response contains invalid unix timestamp: {value}")]
    InvalidTimestamp { value: String },
}

/// Error payload returned by SMSAPI instead of the expected body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorPayload {
    pub code: ErrorCode,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorJson {
    #[serde(default)]
    error: Option<TransportScalar>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Detect an error payload: any JSON object with a non-null top-level `error`.
///
/// Messaging endpoints answer `{"error": 13, "message": "..."}`, the contacts endpoints
/// `{"error": "invalid_phone_number", "message": "...", "code": 400}`.
pub fn decode_api_error(body: &str) -> Option<ApiErrorPayload> {
    let parsed: ApiErrorJson = serde_json::from_str(body).ok()?;
    let code = parsed.error?;
    let message = match parsed.message {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    Some(ApiErrorPayload {
        code: ErrorCode::new(code.into_string()),
        message,
    })
}
