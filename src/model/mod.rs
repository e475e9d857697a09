//! Remote generative model client.

mod provider;
pub mod providers;
mod types;

pub use provider::ContentModel;
pub use types::{
    AspectRatio, Candidate, Content, ContentRequest, ContentResponse, GenerationConfig,
    ImageConfig, InlineData, ModelProviderKind, Part, PromptFeedback, ResponseModality,
    ResponsePart,
};
