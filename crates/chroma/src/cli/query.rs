//! The `chroma query` command.

use anyhow::Context;
use chroma_core::output::OutputFormat as CoreOutputFormat;
use chroma_core::{Chroma, Config, OutputWriter};
use clap::{Args, ValueEnum};

use super::StorageArgs;

/// Arguments for the `query` command.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Smallest depth to include
    #[arg(long, allow_hyphen_values = true)]
    pub min: i64,

    /// Largest depth to include
    #[arg(long, allow_hyphen_values = true)]
    pub max: i64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub storage: StorageArgs,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Execute the query command.
pub fn execute(args: QueryArgs, mut config: Config) -> anyhow::Result<()> {
    args.storage.apply(&mut config);
    if args.min > args.max {
        tracing::warn!(
            "--min {} is greater than --max {}; nothing can match",
            args.min,
            args.max
        );
    }

    let chroma = Chroma::new(config);
    let records = chroma.query_by_depth_range(args.min, args.max)?;
    if records.is_empty() {
        tracing::info!("No images found for the given depth range");
    } else {
        tracing::debug!("{} records matched", records.len());
    }

    let mut writer = OutputWriter::new(std::io::stdout().lock(), args.format.into(), args.pretty);
    writer
        .write_all(&records)
        .and_then(|_| writer.flush())
        .context("Failed to write records to stdout")?;
    Ok(())
}
