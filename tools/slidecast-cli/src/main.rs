//! slidecast CLI: rebuild presentations and editable timelines from raw
//! conference recordings.
//!
//! Usage:
//!   slidecast slides <PATH>      Export annotated slides as PDF
//!   slidecast timeline <PATH>    Export a Kdenlive timeline
//!   slidecast info <PATH>        Show recording information
//!   slidecast check              Check external tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slidecast_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "slidecast",
    about = "Rebuild slides and editable timelines from raw conference recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every slide with its final annotations, one PDF per presentation
    Slides {
        /// Path to the raw recording directory
        path: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        output: PathBuf,
    },

    /// Export the session as a Kdenlive project
    Timeline {
        /// Path to the raw recording directory
        path: PathBuf,

        /// Output document (defaults to <PATH>/<name>.kdenlive)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixel height of rendered slide frames
        #[arg(long)]
        frame_height: Option<u32>,
    },

    /// Show recording information
    Info {
        /// Path to the raw recording directory
        path: PathBuf,
    },

    /// Check that the external rasterizer and PDF joiner are installed
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    slidecast_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Slides { path, output } => commands::slides::run(path, output, &config),
        Commands::Timeline {
            path,
            output,
            frame_height,
        } => commands::timeline::run(path, output, frame_height, &config),
        Commands::Info { path } => commands::info::run(path, &config),
        Commands::Check => commands::check::run(&config),
    }
}
