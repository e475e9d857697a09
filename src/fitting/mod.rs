//! Size estimation and virtual try-on over a [`ContentModel`].

mod size;
mod try_on;

pub use size::{ParseSizeCodeError, SizeCode};
pub use try_on::TryOnError;

use crate::model::{AspectRatio, ContentModel};

/// Model used for size estimation when none is configured.
pub const DEFAULT_SIZE_MODEL: &str = "gemini-3-flash-preview";

/// Model used for try-on synthesis when none is configured.
pub const DEFAULT_TRY_ON_MODEL: &str = "gemini-2.5-flash-image";

/// Aspect ratio requested for try-on images when none is configured.
pub const DEFAULT_TRY_ON_ASPECT_RATIO: AspectRatio = AspectRatio::StandardPortrait;

/// Builder for FittingRoom.
#[derive(Debug, Clone)]
pub struct FittingRoomBuilder<M> {
    model: M,
    size_model: Option<String>,
    try_on_model: Option<String>,
    aspect_ratio: Option<AspectRatio>,
}

impl<M: ContentModel> FittingRoomBuilder<M> {
    /// Creates a builder around an already configured model client.
    pub fn new(model: M) -> Self {
        Self {
            model,
            size_model: None,
            try_on_model: None,
            aspect_ratio: None,
        }
    }

    /// Sets the model identifier used by [`FittingRoom::estimate_size`].
    pub fn size_model(mut self, model: impl Into<String>) -> Self {
        self.size_model = Some(model.into());
        self
    }

    /// Sets the model identifier used by [`FittingRoom::try_on`].
    pub fn try_on_model(mut self, model: impl Into<String>) -> Self {
        self.try_on_model = Some(model.into());
        self
    }

    /// Sets the aspect ratio requested for try-on images.
    pub fn aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Builds the fitting room.
    pub fn build(self) -> FittingRoom<M> {
        FittingRoom {
            model: self.model,
            size_model: self
                .size_model
                .unwrap_or_else(|| DEFAULT_SIZE_MODEL.to_string()),
            try_on_model: self
                .try_on_model
                .unwrap_or_else(|| DEFAULT_TRY_ON_MODEL.to_string()),
            aspect_ratio: self.aspect_ratio.unwrap_or(DEFAULT_TRY_ON_ASPECT_RATIO),
        }
    }
}

/// Size estimation and try-on synthesis bound to one model client.
///
/// Holds no mutable state. Every call issues exactly one request and never
/// retries.
#[derive(Debug)]
pub struct FittingRoom<M> {
    model: M,
    size_model: String,
    try_on_model: String,
    aspect_ratio: AspectRatio,
}

impl<M: ContentModel> FittingRoom<M> {
    /// Creates a fitting room with default model identifiers.
    pub fn new(model: M) -> Self {
        Self::builder(model).build()
    }

    /// Creates a new `FittingRoomBuilder`.
    pub fn builder(model: M) -> FittingRoomBuilder<M> {
        FittingRoomBuilder::new(model)
    }

    /// Returns the underlying model client.
    pub fn model(&self) -> &M {
        &self.model
    }
}

#[cfg(feature = "gemini")]
impl FittingRoom<crate::model::providers::GeminiClient> {
    /// Creates a fitting room backed by Gemini, with the API key taken from the environment.
    pub fn from_env() -> crate::Result<Self> {
        let client = crate::model::providers::GeminiClient::builder().build()?;
        Ok(Self::new(client))
    }
}
