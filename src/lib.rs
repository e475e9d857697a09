#![warn(missing_docs)]
//! fitroom - Virtual try-on and size estimation over a generative image API.
//!
//! Photos travel as data URLs (`data:<mime>;base64,<payload>`). The
//! [`ingest`] adapters produce them from local files or remote URLs. A
//! [`FittingRoom`] sends them to a [`ContentModel`] (Gemini by default) and
//! returns a size code or a generated try-on image.
//!
//! # Quick Start
//!
//! ```no_run
//! use fitroom::{ingest, FittingRoom, GeminiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::builder().build()?;
//!     let room = FittingRoom::new(client);
//!
//!     let me = ingest::from_file("me.jpg").await?;
//!     let set = ingest::ImageProxy::default()
//!         .from_remote_url("https://shop.example/sculpt-set.jpg")
//!         .await?;
//!
//!     let size = room.estimate_size(&me, "Sculpt Set").await;
//!     let image = room.try_on(&me, &set, "Sculpt Set").await?;
//!     println!("size {size}, image {} bytes", image.len());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `gemini` (default): Gemini `generateContent` client
//! - `cli`: Command-line interface

pub mod data_url;
mod error;
pub mod fitting;
pub mod ingest;
pub mod model;

// Re-export error types at crate root
pub use error::{FitroomError, Result};

pub use fitting::{FittingRoom, FittingRoomBuilder, SizeCode, TryOnError};
pub use model::{AspectRatio, ContentModel, ContentRequest, ContentResponse, ModelProviderKind};

#[cfg(feature = "gemini")]
pub use model::providers::{GeminiClient, GeminiClientBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{FitroomError, Result};
    pub use crate::fitting::{FittingRoom, SizeCode, TryOnError};
    pub use crate::ingest::{from_file, ImageProxy};
    pub use crate::model::ContentModel;

    #[cfg(feature = "gemini")]
    pub use crate::model::providers::GeminiClient;
}
