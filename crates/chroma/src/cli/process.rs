//! The `chroma process` command.

use anyhow::Context;
use chroma_core::{Chroma, Config, OutputFormat, OutputWriter};
use clap::Args;
use std::path::PathBuf;

use super::StorageArgs;

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image file to process
    #[arg(required = true)]
    pub input: PathBuf,

    /// Depth recorded with the image (defaults to transform.default_depth)
    #[arg(short, long, allow_hyphen_values = true)]
    pub depth: Option<i64>,

    /// Target width (defaults to transform.width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height (defaults to transform.height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Pretty-print the resulting record
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub storage: StorageArgs,
}

/// Execute the process command.
pub fn execute(args: ProcessArgs, mut config: Config) -> anyhow::Result<()> {
    args.storage.apply(&mut config);
    let width = args.width.unwrap_or(config.transform.width);
    let height = args.height.unwrap_or(config.transform.height);

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let hint = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let chroma = Chroma::new(config);
    let record = chroma.run_pipeline_with(&bytes, hint, width, height, args.depth)?;

    OutputWriter::new(std::io::stdout().lock(), OutputFormat::Json, args.pretty)
        .write(&record)
        .context("Failed to write record to stdout")?;

    tracing::info!(
        "Wrote {} and {}",
        record.processed_path,
        record.colormap_path
    );
    Ok(())
}
