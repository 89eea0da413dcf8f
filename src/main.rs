use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};

use human_cutout::{config::load_run_settings, CutoutEngine};

#[derive(Parser)]
#[command(
    name = "human-cutout",
    version,
    about = "AI-powered background removal for images and videos",
    long_about = "human-cutout removes the background of every image and video in a file or directory. Images are written as transparent PNGs, videos are re-encoded frame by frame into a format that keeps transparency."
)]
struct Cli {
    /// Input file or directory
    #[arg(short, long, default_value = "./input")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Video output format (webm, mov, gif)
    #[arg(short, long, default_value = "webm")]
    format: String,

    /// Output quality (low, medium, high)
    #[arg(short, long, default_value = "medium")]
    quality: String,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    info!("🎬 human-cutout v{} - AI Background Removal", env!("CARGO_PKG_VERSION"));

    // Dropping the run on Ctrl-C releases any frame workspace it holds
    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> human_cutout::Result<()> {
    let (options, config) =
        load_run_settings(&cli.format, &cli.quality, cli.config.as_deref())?;

    let input = absolute(&cli.input)?;
    let output = absolute(&cli.output)?;
    info!("Input: {:?}", input);
    info!("Output: {:?}", output);

    let engine = CutoutEngine::from_config(&config);
    let summary = engine.run(&input, &output, options).await?;

    info!("✅ Done! {} file(s) written to {:?}", summary.outputs.len(), output);
    Ok(())
}

fn absolute(path: &Path) -> human_cutout::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
