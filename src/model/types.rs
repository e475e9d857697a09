//! Request and response types for multi-part content generation.

use crate::data_url;
use serde::{Deserialize, Serialize};

/// Model provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProviderKind {
    /// Google Gemini `generateContent`.
    Gemini,
    /// Any other implementation, such as a test double.
    Custom,
}

impl std::fmt::Display for ModelProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Common aspect ratios for generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square aspect ratio.
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape (widescreen) aspect ratio.
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait (tall) aspect ratio.
    #[serde(rename = "9:16")]
    Portrait,
    /// 4:3 standard landscape aspect ratio.
    #[serde(rename = "4:3")]
    Standard,
    /// 3:4 standard portrait aspect ratio.
    #[serde(rename = "3:4")]
    StandardPortrait,
    /// 21:9 ultrawide aspect ratio.
    #[serde(rename = "21:9")]
    Ultrawide,
}

impl AspectRatio {
    /// Returns the aspect ratio as a string (e.g., "3:4").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::StandardPortrait => "3:4",
            Self::Ultrawide => "21:9",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output modalities the model may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    /// Plain text.
    Text,
    /// Inline image data.
    Image,
}

/// Inline binary content, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload.
    #[serde(default)]
    pub mime_type: String,
    /// Base64 payload without any data URL prefix.
    #[serde(default)]
    pub data: String,
}

impl InlineData {
    /// Splits a data URL into an inline data part.
    pub fn from_data_url(url: &str) -> Self {
        Self {
            mime_type: data_url::mime_type(url).to_string(),
            data: data_url::strip_encoding(url).to_string(),
        }
    }
}

/// One piece of a request, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A text instruction.
    Text(String),
    /// An inline image or other binary payload.
    InlineData(InlineData),
}

/// Image-specific generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Desired output aspect ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

/// Optional generation settings passed through to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Modalities the answer may contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<ResponseModality>>,
    /// Image output settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// A single-turn request to a content model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    /// Model identifier, e.g. `gemini-2.5-flash-image`.
    pub model: String,
    /// Ordered content parts.
    pub parts: Vec<Part>,
    /// Generation settings, if any.
    pub config: Option<GenerationConfig>,
}

impl ContentRequest {
    /// Creates an empty request for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
            config: None,
        }
    }

    /// Appends a text part.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }

    /// Appends an image part taken from a data URL.
    pub fn with_image(mut self, data_url: &str) -> Self {
        self.parts
            .push(Part::InlineData(InlineData::from_data_url(data_url)));
        self
    }

    /// Requests a fixed output aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.config.get_or_insert_with(Default::default).image_config = Some(ImageConfig {
            aspect_ratio: Some(ratio),
        });
        self
    }

    /// Restricts the modalities the model may answer with.
    pub fn with_response_modalities(mut self, modalities: Vec<ResponseModality>) -> Self {
        self.config
            .get_or_insert_with(Default::default)
            .response_modalities = Some(modalities);
        self
    }
}

/// A part of a model answer. Either field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    /// Text content.
    #[serde(default)]
    pub text: Option<String>,
    /// Inline binary content.
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// Content of a candidate answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    /// Ordered answer parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// One alternative output returned by the model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content. Missing when generation was stopped early.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped (`STOP`, `SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Human readable block explanation.
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

/// A model answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    /// Candidate outputs, best first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt-level feedback (returned with HTTP 200).
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl ContentResponse {
    /// Returns the concatenated text parts of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_as_str() {
        assert_eq!(AspectRatio::StandardPortrait.as_str(), "3:4");
        assert_eq!(AspectRatio::Square.to_string(), "1:1");
    }

    #[test]
    fn test_inline_data_from_data_url() {
        let part = InlineData::from_data_url("data:image/jpeg;base64,/9j/");
        assert_eq!(part.mime_type, "image/jpeg");
        assert_eq!(part.data, "/9j/");

        let bare = InlineData::from_data_url("iVBORw0KGgo=");
        assert_eq!(bare.mime_type, "image/png");
        assert_eq!(bare.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_request_builder_keeps_part_order() {
        let req = ContentRequest::new("m")
            .with_image("data:image/png;base64,AAA")
            .with_image("data:image/webp;base64,BBB")
            .with_text("go");
        assert_eq!(req.parts.len(), 3);
        assert!(matches!(&req.parts[0], Part::InlineData(d) if d.data == "AAA"));
        assert!(matches!(&req.parts[1], Part::InlineData(d) if d.mime_type == "image/webp"));
        assert_eq!(req.parts[2], Part::Text("go".into()));
        assert!(req.config.is_none());
    }

    #[test]
    fn test_request_builder_merges_config() {
        let req = ContentRequest::new("m")
            .with_aspect_ratio(AspectRatio::StandardPortrait)
            .with_response_modalities(vec![ResponseModality::Image]);
        let config = req.config.unwrap();
        assert_eq!(
            config.image_config.unwrap().aspect_ratio,
            Some(AspectRatio::StandardPortrait)
        );
        assert_eq!(config.response_modalities, Some(vec![ResponseModality::Image]));
    }

    #[test]
    fn test_generation_config_serialization() {
        let config = GenerationConfig {
            response_modalities: Some(vec![ResponseModality::Text, ResponseModality::Image]),
            image_config: Some(ImageConfig {
                aspect_ratio: Some(AspectRatio::StandardPortrait),
            }),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": { "aspectRatio": "3:4" }
            })
        );
    }

    #[test]
    fn test_response_text_concatenates_first_candidate() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": " x" }, { "text": "l \n" }] } },
                { "content": { "parts": [{ "text": "S" }] } }
            ]
        }"#;
        let resp: ContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text().as_deref(), Some(" xl \n"));
    }

    #[test]
    fn test_response_text_absent() {
        let empty: ContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);

        let image_only: ContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"abc"}}]}}]}"#,
        )
        .unwrap();
        assert_eq!(image_only.text(), None);
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ModelProviderKind::Gemini.to_string(), "gemini");
        assert_eq!(ModelProviderKind::Custom.to_string(), "custom");
    }
}
