//! Size estimation example.
//!
//! Run with: `cargo run --example estimate_size -- <me.jpg> "<product name>"`
//!
//! Requires `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) environment variable.

use fitroom::{ingest, FittingRoom};

#[tokio::main]
async fn main() -> fitroom::Result<()> {
    let photo = std::env::args()
        .nth(1)
        .expect("Usage: estimate_size <me.jpg> <product name>");
    let product = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "Running Shorts".to_string());

    let room = FittingRoom::from_env()?;
    let me = ingest::from_file(&photo).await?;

    let size = room.estimate_size(&me, &product).await;
    println!("Recommended size for {product}: {size}");

    Ok(())
}
