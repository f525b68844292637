//! API error types for The Odds API client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {status_code} - {message}")]
    Http { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Parse error from API response body.
    ///
    /// The Odds API answers failures with `{"message": ..., "error_code": ...}`;
    /// anything else is kept verbatim.
    pub fn from_response(status_code: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                let message = json.get("message")?.as_str()?.to_string();
                Some(match json.get("error_code").and_then(|v| v.as_str()) {
                    Some(code) => format!("{code}: {message}"),
                    None => message,
                })
            })
            .unwrap_or_else(|| body.to_string());

        Self::Http {
            status_code,
            message,
        }
    }

    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::Deserialization(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }

    /// HTTP status for `Http` errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
