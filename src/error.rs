//! Error types for fitting-room operations.

use std::time::Duration;

/// Maximum length of a remote error body carried inside an error message.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while talking to the model service or handling images.
#[derive(Debug, thiserror::Error)]
pub enum FitroomError {
    /// API key missing, malformed or not recognized.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Access denied for the caller's location or billing state.
    #[error("access restricted: {0}")]
    Region(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The model answered without an image.
    #[error("no image generated: {0}")]
    NoImage(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Failed to decode or re-encode image pixels.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (e.g., reading a photo).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for fitting-room operations.
pub type Result<T> = std::result::Result<T, FitroomError>;

/// Collapses whitespace and truncates a remote error body so it fits in a log line.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_ERROR_MESSAGE_LEN {
        return flat;
    }
    let truncated: String = flat.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
    format!("{truncated}...")
}

/// Reads a `retry-after` header given in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn test_error_display() {
        let err = FitroomError::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = FitroomError::NoImage("empty parts".into());
        assert_eq!(err.to_string(), "no image generated: empty parts");
    }

    #[test]
    fn test_sanitize_flattens_whitespace() {
        assert_eq!(
            sanitize_error_message("  bad\n  request\t body "),
            "bad request body"
        );
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let long = "x".repeat(MAX_ERROR_MESSAGE_LEN + 50);
        let out = sanitize_error_message(&long);
        assert_eq!(out.len(), MAX_ERROR_MESSAGE_LEN + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
        assert_eq!(parse_retry_after(&headers), Some(12));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), None);
    }
}
