use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Login required - session is no longer valid")]
    LoginRequired,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Marker the platform puts in error payloads when a session has expired
const LOGIN_REQUIRED_MESSAGE: &str = "login_required";

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    require_login: bool,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Whether an error payload says the session must log in again.
    pub fn is_login_required_body(body: &str) -> bool {
        match serde_json::from_str::<ErrorPayload>(body) {
            Ok(payload) => {
                payload.require_login
                    || payload.message.as_deref() == Some(LOGIN_REQUIRED_MESSAGE)
            }
            Err(_) => false,
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if Self::is_login_required_body(body) {
            return ApiError::LoginRequired;
        }
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::LoginRequired,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}
