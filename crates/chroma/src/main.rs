//! Chroma CLI - resize images, render them in false color, query by depth.
//!
//! # Usage
//!
//! ```bash
//! # Process one image (150x110, depth 120 unless given)
//! chroma process leaf.jpg --depth 80
//!
//! # List recorded images with depth between 50 and 150
//! chroma query --min 50 --max 150
//!
//! # Run the HTTP upload service
//! chroma serve --port 5000
//!
//! # View configuration
//! chroma config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod cli;
mod logging;
mod server;

/// Chroma - resize images, render them in false color, query them by depth.
#[derive(Parser, Debug)]
#[command(name = "chroma")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "CHROMA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resize an image, render its colormap, and record its metadata
    Process(cli::process::ProcessArgs),

    /// List recorded images within a depth range
    Query(cli::query::QueryArgs),

    /// Serve the upload and depth-filter HTTP API
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

/// Load the explicit config strictly; fall back to defaults for the implicit one.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<chroma_core::Config> {
    if let Some(path) = explicit {
        return chroma_core::Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    // Logging isn't initialized yet, so use eprintln for config warnings.
    Ok(chroma_core::Config::load().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config: {e}\n  \
             Using default configuration. Check your config file with `chroma config path`."
        );
        chroma_core::Config::default()
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Chroma v{}", chroma_core::VERSION);

    match cli.command {
        Commands::Process(args) => cli::process::execute(args, config),
        Commands::Query(args) => cli::query::execute(args, config),
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config.as_deref()),
    }
}
