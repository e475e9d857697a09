//! Clothing size estimation from a single photo.

use super::FittingRoom;
use crate::model::{ContentModel, ContentRequest};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A clothing size code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeCode {
    /// Extra small.
    XS,
    /// Small.
    S,
    /// Medium. Used whenever no valid size is available.
    #[default]
    M,
    /// Large.
    L,
    /// Extra large.
    XL,
    /// Double extra large.
    XXL,
}

impl SizeCode {
    /// All size codes, smallest first.
    pub const ALL: [SizeCode; 6] = [
        SizeCode::XS,
        SizeCode::S,
        SizeCode::M,
        SizeCode::L,
        SizeCode::XL,
        SizeCode::XXL,
    ];

    /// Returns the size code as a string (e.g., "XL").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XS => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
        }
    }

    /// Reads a model answer, falling back to [`SizeCode::M`] for anything unexpected.
    pub fn from_answer(text: Option<&str>) -> Self {
        text.and_then(|t| t.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for SizeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text is not one of the six size codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a size code: {0:?}")]
pub struct ParseSizeCodeError(String);

impl FromStr for SizeCode {
    type Err = ParseSizeCodeError;

    /// Parses a size code, ignoring surrounding whitespace and letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| ParseSizeCodeError(s.to_string()))
    }
}

fn size_prompt(product_name: &str) -> String {
    format!(
        r#"Analyze the body shape of the person in the image.
Recommend the best fitting size of this product: "{product_name}".
Available sizes: [XS, S, M, L, XL, XXL].

Be realistic. For a curvy, broad or strong build choose L, XL or XXL.
Do not pick M by default when the build is not average.

Answer with the size code only (for example "XL"). No other text."#
    )
}

impl<M: ContentModel> FittingRoom<M> {
    /// Recommends a clothing size for the person in `photo` (a data URL).
    ///
    /// Never fails: call errors and unexpected answers both resolve to
    /// [`SizeCode::M`].
    pub async fn estimate_size(&self, photo: &str, product_name: &str) -> SizeCode {
        let request = ContentRequest::new(&self.size_model)
            .with_image(photo)
            .with_text(size_prompt(product_name));

        match self.model.generate_content(&request).await {
            Ok(response) => {
                let answer = response.text();
                let size = SizeCode::from_answer(answer.as_deref());
                tracing::debug!(answer = ?answer, size = %size, "size estimated");
                size
            }
            Err(e) => {
                tracing::error!(error = %e, "size estimation failed, using default size");
                SizeCode::default()
            }
        }
    }
}
