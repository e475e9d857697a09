//! Data URL helpers (`data:<mime>;base64,<payload>`).
//!
//! Every photo crossing the crate boundary is a data URL. These helpers split
//! one into the MIME type and the base64 payload the model API expects.

use crate::error::{FitroomError, Result};
use base64::Engine;

/// MIME type assumed when a data URL does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Splits `data:<mime>;base64,<payload>` into its two halves.
fn split(data_url: &str) -> Option<(&str, &str)> {
    let rest = data_url.strip_prefix("data:")?;
    let (mime, rest) = rest.split_once(';')?;
    if mime.is_empty() {
        return None;
    }
    let payload = rest.strip_prefix("base64,")?;
    Some((mime, payload))
}

/// Returns true if the string is a data URL rather than a location.
pub fn is_data_url(s: &str) -> bool {
    s.starts_with("data:")
}

/// Returns the declared MIME type, or [`DEFAULT_MIME_TYPE`] when none can be parsed.
pub fn mime_type(data_url: &str) -> &str {
    split(data_url).map_or(DEFAULT_MIME_TYPE, |(mime, _)| mime)
}

/// Removes the `data:<mime>;base64,` prefix. Input without one is returned as is.
pub fn strip_encoding(data_url: &str) -> &str {
    split(data_url).map_or(data_url, |(_, payload)| payload)
}

/// Builds a data URL from raw bytes.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Decodes the payload of a data URL (or a bare base64 string) into bytes.
pub fn decode(data_url: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(strip_encoding(data_url).trim())
        .map_err(|e| FitroomError::Decode(e.to_string()))
}
