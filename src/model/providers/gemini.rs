//! Gemini (Google) `generateContent` client.

use crate::error::{parse_retry_after, sanitize_error_message, FitroomError, Result};
use crate::model::provider::ContentModel;
use crate::model::types::{
    ContentRequest, ContentResponse, GenerationConfig, ModelProviderKind, Part,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default REST endpoint of the Generative Language API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables consulted for the API key, in order.
const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Builder for GeminiClient.
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API base URL (useful for proxies and tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a whole-request timeout on the underlying HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client, resolving the API key.
    pub fn build(self) -> Result<GeminiClient> {
        let api_key = resolve_api_key(self.api_key, |var| std::env::var(var).ok())
            .ok_or_else(|| {
                FitroomError::Auth(
                    "GEMINI_API_KEY or GOOGLE_API_KEY not set and no API key provided".into(),
                )
            })?;

        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(GeminiClient {
            client: client.build()?,
            api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Picks the first non-blank key: explicit, then each of `API_KEY_ENV_VARS`.
fn resolve_api_key(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let not_blank = |key: &String| !key.trim().is_empty();
    explicit
        .filter(not_blank)
        .or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .find_map(|var| lookup(var).filter(not_blank))
        })
}

/// Gemini content generation client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Creates a new `GeminiClientBuilder`.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    async fn generate_impl(&self, request: &ContentRequest) -> Result<ContentResponse> {
        let start = Instant::now();

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = GeminiRequest::from_content_request(request);

        tracing::debug!(
            model = %request.model,
            parts = request.parts.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        let content: ContentResponse = response.json().await?;

        tracing::debug!(
            model = %request.model,
            candidates = content.candidates.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generateContent complete"
        );

        Ok(content)
    }
}

/// Maps a non-2xx Gemini response to a structured error.
fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> FitroomError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(text)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| text.to_string());
    let message = sanitize_error_message(&message);
    let lower = message.to_lowercase();

    if status == 429 {
        let retry_after = parse_retry_after(headers).map(Duration::from_secs);
        return FitroomError::RateLimited { retry_after };
    }
    if lower.contains("location") || lower.contains("region") {
        return FitroomError::Region(message);
    }
    if status == 402 || lower.contains("billing") {
        return FitroomError::Region(message);
    }
    if status == 401 || lower.contains("api key") {
        return FitroomError::Auth(message);
    }
    if status == 403 {
        return FitroomError::Region(message);
    }
    if status == 404 {
        return FitroomError::InvalidRequest(
            "Model not found. Verify the model name is correct.".into(),
        );
    }
    if lower.contains("safety") || lower.contains("blocked") || lower.contains("prohibited") {
        return FitroomError::ContentBlocked(message);
    }
    FitroomError::Api { status, message }
}

#[async_trait]
impl ContentModel for GeminiClient {
    async fn generate_content(&self, request: &ContentRequest) -> Result<ContentResponse> {
        self.generate_impl(request).await
    }

    fn kind(&self) -> ModelProviderKind {
        ModelProviderKind::Gemini
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/models?pageSize=1", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let headers = response.headers().clone();
        let text = response.text().await.unwrap_or_default();
        Err(parse_error(status.as_u16(), &text, &headers))
    }
}

// Wire types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<&'a GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiRequestPart<'a>>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

impl<'a> GeminiRequest<'a> {
    fn from_content_request(req: &'a ContentRequest) -> Self {
        let parts = req
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => GeminiRequestPart::Text {
                    text: text.as_str(),
                },
                Part::InlineData(data) => GeminiRequestPart::InlineData {
                    inline_data: GeminiInlineData {
                        mime_type: data.mime_type.as_str(),
                        data: data.data.as_str(),
                    },
                },
            })
            .collect();

        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts,
            }],
            generation_config: req.config.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::AspectRatio;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn test_builder_with_explicit_key() {
        let client = GeminiClientBuilder::new()
            .api_key("test-key")
            .base_url("http://localhost:1234/v1beta/")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "http://localhost:1234/v1beta");
        assert_eq!(client.kind(), ModelProviderKind::Gemini);
        assert_eq!(client.name(), "Gemini (Google)");
    }

    #[test]
    fn test_resolve_key_skips_blank_candidates() {
        let env = |var: &str| match var {
            "GEMINI_API_KEY" => Some(String::new()),
            "GOOGLE_API_KEY" => Some("google-key".to_string()),
            _ => None,
        };
        assert_eq!(resolve_api_key(None, env).as_deref(), Some("google-key"));
        assert_eq!(
            resolve_api_key(Some("  ".into()), env).as_deref(),
            Some("google-key")
        );
        assert_eq!(
            resolve_api_key(Some("explicit".into()), env).as_deref(),
            Some("explicit")
        );
    }

    #[test]
    fn test_resolve_key_prefers_gemini_var() {
        let env = |var: &str| Some(format!("{var}-value"));
        assert_eq!(
            resolve_api_key(None, env).as_deref(),
            Some("GEMINI_API_KEY-value")
        );
    }

    #[test]
    fn test_resolve_key_all_blank_is_none() {
        let env = |_: &str| Some(" \t".to_string());
        assert_eq!(resolve_api_key(Some(String::new()), env), None);
        assert_eq!(resolve_api_key(None, |_: &str| None), None);
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::builder().api_key("secret").build().unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_request_serialization() {
        let req = ContentRequest::new("gemini-2.5-flash-image")
            .with_image("data:image/jpeg;base64,USER")
            .with_text("dress them")
            .with_aspect_ratio(AspectRatio::StandardPortrait);
        let json = serde_json::to_value(GeminiRequest::from_content_request(&req)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "inlineData": { "mimeType": "image/jpeg", "data": "USER" } },
                        { "text": "dress them" }
                    ]
                }],
                "generationConfig": { "imageConfig": { "aspectRatio": "3:4" } }
            })
        );
    }

    #[test]
    fn test_request_without_config_omits_generation_config() {
        let req = ContentRequest::new("m").with_text("hi");
        let json = serde_json::to_value(GeminiRequest::from_content_request(&req)).unwrap();
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_parse_error_invalid_key() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = parse_error(400, body, &HeaderMap::new());
        assert!(
            matches!(&err, FitroomError::Auth(m) if m.starts_with("API key not valid")),
            "got {err:?}"
        );
    }

    #[test]
    fn test_parse_error_location() {
        let body = r#"{"error":{"code":400,"message":"User location is not supported for the API use.","status":"FAILED_PRECONDITION"}}"#;
        let err = parse_error(400, body, &HeaderMap::new());
        assert!(matches!(err, FitroomError::Region(_)), "got {err:?}");
    }

    #[test]
    fn test_parse_error_status_codes() {
        let headers = HeaderMap::new();
        assert!(matches!(
            parse_error(401, "nope", &headers),
            FitroomError::Auth(_)
        ));
        assert!(matches!(
            parse_error(403, "permission denied", &headers),
            FitroomError::Region(_)
        ));
        assert!(matches!(
            parse_error(402, "pay up", &headers),
            FitroomError::Region(_)
        ));
        assert!(matches!(
            parse_error(404, "", &headers),
            FitroomError::InvalidRequest(_)
        ));
        assert!(matches!(
            parse_error(400, "request blocked by safety", &headers),
            FitroomError::ContentBlocked(_)
        ));
        assert!(matches!(
            parse_error(500, "internal", &headers),
            FitroomError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_parse_error_rate_limit() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        let err = parse_error(429, "quota", &headers);
        assert!(matches!(
            err,
            FitroomError::RateLimited {
                retry_after: Some(d)
            } if d == Duration::from_secs(30)
        ));
    }
}
