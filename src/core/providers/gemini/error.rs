//! Gemini error mapping
//!
//! Turns HTTP failures and `error` bodies into [`StudioError`] values whose
//! message is what the user gets to see.

use serde_json::Value;

use crate::utils::error::StudioError;

pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    /// Map a non-2xx response. The API's own message is preferred when the
    /// body carries one.
    pub fn from_http_status(status: u16, body: &str) -> StudioError {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            if json.get("error").is_some() {
                let mut error = Self::from_api_response(&json);
                if let StudioError::Api { status: code, .. } = &mut error {
                    *code = status;
                }
                return error;
            }
        }

        let body = body.trim();
        let message = match status {
            400 => format!("Bad request: {}", Self::or_reason(body, status)),
            401 => "Invalid or missing API key".to_string(),
            403 => "Forbidden: insufficient permissions".to_string(),
            404 => "Model or endpoint not found".to_string(),
            429 => "Rate limit exceeded, try again later".to_string(),
            500..=599 => format!("Server error: {}", Self::or_reason(body, status)),
            _ => Self::or_reason(body, status),
        };
        StudioError::api(status, message)
    }

    /// Map a body of the form `{"error": {"code", "message", "status"}}`
    pub fn from_api_response(response: &Value) -> StudioError {
        if let Some(error) = response.get("error") {
            let code = error
                .get("code")
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(500);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
                .unwrap_or("Unknown error");
            return StudioError::api(code, message);
        }

        if let Some(message) = response.get("message").and_then(|m| m.as_str()) {
            return StudioError::api(500, message);
        }

        StudioError::api(500, "Unknown API error")
    }

    fn or_reason(body: &str, status: u16) -> String {
        if !body.is_empty() {
            return body.to_string();
        }
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string()
    }
}

/// Network-level failure
pub fn gemini_network_error(msg: impl Into<String>) -> StudioError {
    StudioError::transport(msg)
}

/// Body that is not the expected JSON
pub fn gemini_parse_error(msg: impl Into<String>) -> StudioError {
    StudioError::Parse(msg.into())
}
