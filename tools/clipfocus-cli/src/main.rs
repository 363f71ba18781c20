//! ClipFocus CLI: reframe landscape tutorial recordings around the cursor.
//!
//! Usage:
//!   clipfocus reframe <INPUT>    Crop to a target aspect ratio and highlight the cursor
//!   clipfocus probe <INPUT>      Show source video information
//!   clipfocus preview <INPUT>    Render one processed frame to a PNG
//!   clipfocus check              Check that ffmpeg is available

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clipfocus_common::config::AppConfig;

mod commands;

use commands::ReframeArgs;

#[derive(Parser)]
#[command(
    name = "clipfocus",
    about = "Reframe screen recordings for vertical and square formats, following the cursor",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reframe a video
    Reframe {
        /// Source video
        input: PathBuf,

        /// Output file (defaults to `<input>_<ratio>.<ext>` next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ReframeArgs,

        /// Write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show source video information
    Probe {
        /// Source video
        input: PathBuf,
    },

    /// Render one processed frame to a PNG
    Preview {
        /// Source video
        input: PathBuf,

        /// Zero-based frame to render
        #[arg(long, default_value = "0")]
        frame: u64,

        /// PNG output path (defaults to `<input>_preview.png`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ReframeArgs,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut logging = app_config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    clipfocus_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Reframe {
            input,
            output,
            args,
            report,
        } => commands::reframe::run(&app_config, input, output, args, report).await,
        Commands::Probe { input } => commands::probe::run(input).await,
        Commands::Preview {
            input,
            frame,
            output,
            args,
        } => commands::preview::run(&app_config, input, frame, output, args).await,
        Commands::Check => commands::check::run(),
    }
}
