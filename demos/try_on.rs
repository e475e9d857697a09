//! Virtual try-on example - dresses a person in a product photo.
//!
//! Run with: `cargo run --example try_on -- <me.jpg> <product-url-or-path> "<product name>"`
//!
//! Requires `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) environment variable.

use fitroom::{data_url, ingest, FittingRoom};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(me), Some(product), Some(name)) = (args.next(), args.next(), args.next()) else {
        eprintln!("Usage: try_on <me.jpg> <product-url-or-path> <product name>");
        std::process::exit(2);
    };

    let room = FittingRoom::from_env()?;

    let user_photo = ingest::load(&me).await?;
    let product_photo = ingest::load(&product).await?;

    match room.try_on(&user_photo, &product_photo, &name).await {
        Ok(image) => {
            let bytes = data_url::decode(&image)?;
            std::fs::write("try_on.png", &bytes)?;
            println!("Saved try_on.png ({} bytes)", bytes.len());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
