//! Image ingestion: local files and remote URLs to data URLs.
//!
//! Failures surface untranslated. Turning them into user-facing guidance is
//! left to the operation that consumes the photo.

use crate::data_url;
use crate::error::{FitroomError, Result};
use std::io::Cursor;
use std::path::Path;

/// Public image-fetching relay used to read remote images.
const DEFAULT_PROXY_BASE: &str = "https://images.weserv.nl/";

/// MIME type used when a file's type cannot be guessed.
const FALLBACK_FILE_MIME: &str = "application/octet-stream";

/// Reads a local file into a data URL. The MIME type is guessed from the extension.
pub async fn from_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let mime = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_FILE_MIME);
    Ok(data_url::encode(mime, &bytes))
}

/// Builder for ImageProxy.
#[derive(Debug, Clone, Default)]
pub struct ImageProxyBuilder {
    base_url: Option<String>,
    client: Option<reqwest::Client>,
}

impl ImageProxyBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relay endpoint. The original URL is appended as `?url=`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Reuses an existing HTTP client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the proxy adapter.
    pub fn build(self) -> ImageProxy {
        ImageProxy {
            client: self.client.unwrap_or_default(),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_PROXY_BASE.to_string()),
        }
    }
}

/// Fetches remote images through an image relay and re-encodes them as PNG.
#[derive(Debug, Clone)]
pub struct ImageProxy {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ImageProxy {
    fn default() -> Self {
        ImageProxyBuilder::new().build()
    }
}

impl ImageProxy {
    /// Creates a new `ImageProxyBuilder`.
    pub fn builder() -> ImageProxyBuilder {
        ImageProxyBuilder::new()
    }

    /// Rewrites a URL so it is fetched through the relay.
    pub fn proxied_url(&self, url: &str) -> String {
        format!("{}?url={}", self.base_url, urlencoding::encode(url))
    }

    /// Loads a remote image as a PNG data URL.
    ///
    /// Data URLs are returned unchanged without touching the network.
    pub async fn from_remote_url(&self, url: &str) -> Result<String> {
        if data_url::is_data_url(url) {
            return Ok(url.to_string());
        }

        let proxied = self.proxied_url(url);
        tracing::debug!(url = %url, proxied = %proxied, "fetching image through proxy");

        let response = self.client.get(&proxied).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FitroomError::Api {
                status: status.as_u16(),
                message: format!("Failed to load image from {url}"),
            });
        }
        let bytes = response.bytes().await?;

        let png = reencode_png(&bytes)?;
        Ok(data_url::encode("image/png", &png))
    }
}

/// Decodes any supported image and writes it back as PNG at its natural size.
fn reencode_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    tracing::debug!(
        width = decoded.width(),
        height = decoded.height(),
        "re-encoding image as PNG"
    );
    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, image::ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Loads a photo from a path, an `http(s)` URL or a data URL.
pub async fn load(source: &str) -> Result<String> {
    if data_url::is_data_url(source)
        || source.starts_with("http://")
        || source.starts_with("https://")
    {
        ImageProxy::default().from_remote_url(source).await
    } else {
        from_file(source).await
    }
}
