//! Model provider trait.

use crate::error::Result;
use crate::model::types::{ContentRequest, ContentResponse, ModelProviderKind};
use async_trait::async_trait;

/// A remote generative model that answers multi-part content requests.
///
/// Each call is a single request/response exchange. Implementations must not
/// retry on their own.
#[async_trait]
pub trait ContentModel: Send + Sync {
    /// Sends one request and returns the raw response.
    async fn generate_content(&self, request: &ContentRequest) -> Result<ContentResponse>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ModelProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ModelProviderKind::Gemini => "Gemini (Google)",
            ModelProviderKind::Custom => "custom model",
        }
    }

    /// Checks if the provider is reachable and authenticated.
    async fn health_check(&self) -> Result<()>;
}
