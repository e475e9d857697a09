//! CLI for fitroom - size estimation and virtual try-on.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fitroom::{data_url, ingest, AspectRatio, ContentModel, FittingRoom, GeminiClient};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fitroom")]
#[command(about = "Estimate clothing sizes and render virtual try-ons via Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Gemini API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the Gemini API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a clothing size for the person in a photo
    Size(SizeArgs),

    /// Render a person wearing a product
    TryOn(TryOnArgs),

    /// Fetch a remote image through the proxy and save it as PNG
    Fetch(FetchArgs),

    /// Check that the API key is accepted
    Check,
}

#[derive(Args)]
struct SizeArgs {
    /// Photo of the person (path, URL or data URL)
    photo: String,

    /// Product name
    #[arg(short, long)]
    product: String,

    /// Model used for size estimation
    #[arg(long)]
    model: Option<String>,
}

#[derive(Args)]
struct TryOnArgs {
    /// Photo of the person (path, URL or data URL)
    user: String,

    /// Photo of the product (path, URL or data URL)
    product_photo: String,

    /// Product name
    #[arg(short, long)]
    product: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Model used for image synthesis
    #[arg(long)]
    model: Option<String>,

    /// Output aspect ratio
    #[arg(long, value_enum)]
    aspect_ratio: Option<AspectRatioArg>,
}

#[derive(Args)]
struct FetchArgs {
    /// Remote image URL
    url: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Image relay endpoint
    #[arg(long)]
    proxy: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AspectRatioArg {
    #[value(name = "1:1")]
    Square,
    #[value(name = "16:9")]
    Landscape,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "4:3")]
    Standard,
    #[value(name = "3:4")]
    StandardPortrait,
    #[value(name = "21:9")]
    Ultrawide,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(arg: AspectRatioArg) -> Self {
        match arg {
            AspectRatioArg::Square => AspectRatio::Square,
            AspectRatioArg::Landscape => AspectRatio::Landscape,
            AspectRatioArg::Portrait => AspectRatio::Portrait,
            AspectRatioArg::Standard => AspectRatio::Standard,
            AspectRatioArg::StandardPortrait => AspectRatio::StandardPortrait,
            AspectRatioArg::Ultrawide => AspectRatio::Ultrawide,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Size(args) => estimate_size(&cli, args).await?,
        Commands::TryOn(args) => try_on(&cli, args).await?,
        Commands::Fetch(args) => fetch(args, cli.json).await?,
        Commands::Check => check(&cli).await?,
    }

    Ok(())
}

fn build_client(cli: &Cli) -> anyhow::Result<GeminiClient> {
    let mut builder = GeminiClient::builder();
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

async fn estimate_size(cli: &Cli, args: &SizeArgs) -> anyhow::Result<()> {
    let mut room = FittingRoom::builder(build_client(cli)?);
    if let Some(ref model) = args.model {
        room = room.size_model(model);
    }
    let room = room.build();

    let photo = ingest::load(&args.photo).await?;
    let size = room.estimate_size(&photo, &args.product).await;

    if cli.json {
        let result = serde_json::json!({
            "type": "size",
            "product": args.product,
            "size": size,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Recommended size for {}: {}", args.product, size);
    }

    Ok(())
}

async fn try_on(cli: &Cli, args: &TryOnArgs) -> anyhow::Result<()> {
    let mut room = FittingRoom::builder(build_client(cli)?);
    if let Some(ref model) = args.model {
        room = room.try_on_model(model);
    }
    if let Some(ar) = args.aspect_ratio {
        room = room.aspect_ratio(ar.into());
    }
    let room = room.build();

    let user = ingest::load(&args.user).await?;
    let product = ingest::load(&args.product_photo).await?;

    let image = room.try_on(&user, &product, &args.product).await?;
    let bytes = data_url::decode(&image)?;
    std::fs::write(&args.output, &bytes)?;

    if cli.json {
        let result = serde_json::json!({
            "type": "try-on",
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": bytes.len(),
            "mime_type": data_url::mime_type(&image),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Generated try-on: {} ({} bytes)",
            args.output.display(),
            bytes.len()
        );
    }

    Ok(())
}

async fn fetch(args: &FetchArgs, json_output: bool) -> anyhow::Result<()> {
    let mut proxy = ingest::ImageProxy::builder();
    if let Some(ref base) = args.proxy {
        proxy = proxy.base_url(base);
    }
    let image = proxy.build().from_remote_url(&args.url).await?;
    let bytes = data_url::decode(&image)?;
    std::fs::write(&args.output, &bytes)?;

    if json_output {
        let result = serde_json::json!({
            "type": "fetch",
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": bytes.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Saved {} ({} bytes)", args.output.display(), bytes.len());
    }

    Ok(())
}

async fn check(cli: &Cli) -> anyhow::Result<()> {
    let client = build_client(cli)?;
    client.health_check().await?;

    if cli.json {
        let result = serde_json::json!({
            "type": "check",
            "success": true,
            "provider": client.kind().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} is reachable and the API key was accepted", client.name());
    }

    Ok(())
}
