//! Virtual try-on synthesis.

use super::FittingRoom;
use crate::error::{FitroomError, Result};
use crate::model::{ContentModel, ContentRequest, ContentResponse, ResponseModality};

/// Finish reasons that mean the candidate was withheld by a safety filter.
const BLOCKED_FINISH_REASONS: [&str; 7] = [
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "IMAGE_RECITATION",
    "RECITATION",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
];

/// A failed try-on, phrased for the end user.
///
/// The underlying error is kept as the source.
#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    /// The API key was not recognized or is malformed.
    #[error(
        "The image service did not accept the API key. \
         Check that a valid Gemini API key is configured (GEMINI_API_KEY)."
    )]
    Credentials {
        /// Underlying failure.
        #[source]
        source: FitroomError,
    },

    /// The service refused access for this region or billing account.
    #[error(
        "The image service is not available for this location or account. \
         Check regional availability and that billing is enabled for the API key."
    )]
    AccessRestricted {
        /// Underlying failure.
        #[source]
        source: FitroomError,
    },

    /// Any other failure. The original message is included.
    #[error("Try-on failed due to a technical error: {source}")]
    Technical {
        /// Underlying failure.
        #[source]
        source: FitroomError,
    },
}

impl TryOnError {
    /// Classifies a failure into one of the user-facing categories.
    ///
    /// Structured variants decide first. Only text supplied by the remote
    /// service (`Api`) is checked for known markers. Everything else is
    /// technical.
    pub fn classify(source: FitroomError) -> Self {
        match source {
            FitroomError::Auth(_) => Self::Credentials { source },
            FitroomError::Region(_) => Self::AccessRestricted { source },
            FitroomError::Api {
                status,
                ref message,
            } => {
                if status == 400 || message.contains("API key") {
                    Self::Credentials { source }
                } else if status == 403 || message.contains("location") {
                    Self::AccessRestricted { source }
                } else {
                    Self::Technical { source }
                }
            }
            _ => Self::Technical { source },
        }
    }

    /// Returns the underlying failure.
    pub fn inner(&self) -> &FitroomError {
        match self {
            Self::Credentials { source }
            | Self::AccessRestricted { source }
            | Self::Technical { source } => source,
        }
    }
}

fn try_on_prompt(product_name: &str) -> String {
    format!(
        r#"VIRTUAL TRY-ON. HIGH PRECISION REQUIRED.

Dress the person in image 1 in the COMPLETE outfit shown in image 2.
Product: "{product_name}".

Rules:
1. COMPLETE OUTFIT: apply every piece of the garment set from image 2 (for example both top and bottom), never only a part of it.
2. DESIGN FIDELITY: reproduce seams, textures, colors, prints and cut-outs exactly as in image 2. Do not add pockets, logos or new stitching.
3. NO INVENTION: use only clothing parts visible in the reference image.
4. IDENTITY: keep the face, hair, skin tone, hands and the original background of image 1 unchanged.
5. FIT: drape the fabric realistically over the person's body shape.

Return one high-quality photorealistic image."#
    )
}

/// Pulls the generated image out of a response as a PNG data URL.
///
/// Only the first inline image of the first candidate is used. Further
/// images are discarded.
fn extract_image(response: ContentResponse) -> Result<String> {
    if let Some(ref feedback) = response.prompt_feedback {
        if let Some(ref reason) = feedback.block_reason {
            let msg = feedback
                .block_reason_message
                .clone()
                .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
            return Err(FitroomError::ContentBlocked(msg));
        }
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| FitroomError::NoImage("response has no candidates".into()))?;

    if let Some(ref reason) = candidate.finish_reason {
        if BLOCKED_FINISH_REASONS.contains(&reason.as_str()) {
            return Err(FitroomError::ContentBlocked(format!(
                "Candidate withheld by safety filter: {}",
                reason
            )));
        }
    }

    let parts = candidate
        .content
        .map(|c| c.parts)
        .filter(|parts| !parts.is_empty())
        .ok_or_else(|| FitroomError::NoImage("response has no content parts".into()))?;

    if let Some(data) = parts
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .find(|d| !d.data.is_empty())
    {
        return Ok(format!("data:image/png;base64,{}", data.data));
    }

    let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    if !text.is_empty() {
        tracing::warn!(text = %text, "model answered with text instead of an image");
    }
    Err(FitroomError::NoImage(
        "no response part carried image data".into(),
    ))
}

impl<M: ContentModel> FittingRoom<M> {
    /// Renders the person in `user_photo` wearing the garment in `product_photo`.
    ///
    /// Both photos are data URLs. Returns the generated image as a
    /// `data:image/png;base64,...` URL. Every failure is surfaced. No
    /// placeholder image is ever returned.
    pub async fn try_on(
        &self,
        user_photo: &str,
        product_photo: &str,
        product_name: &str,
    ) -> std::result::Result<String, TryOnError> {
        self.generate_try_on(user_photo, product_photo, product_name)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "virtual try-on failed");
                TryOnError::classify(e)
            })
    }

    async fn generate_try_on(
        &self,
        user_photo: &str,
        product_photo: &str,
        product_name: &str,
    ) -> Result<String> {
        let request = ContentRequest::new(&self.try_on_model)
            .with_image(user_photo)
            .with_image(product_photo)
            .with_text(try_on_prompt(product_name))
            .with_aspect_ratio(self.aspect_ratio)
            .with_response_modalities(vec![ResponseModality::Text, ResponseModality::Image]);

        let response = self.model.generate_content(&request).await?;
        extract_image(response)
    }
}
