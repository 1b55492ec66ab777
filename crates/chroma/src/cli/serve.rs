//! The `chroma serve` command.

use chroma_core::{Chroma, Config};
use clap::Args;
use std::sync::Arc;

use super::StorageArgs;
use crate::server::{self, ServerState};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (defaults to server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (defaults to server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.storage.apply(&mut config);
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let max_upload_bytes = usize::try_from(config.server.max_upload_mb.saturating_mul(1024 * 1024))
        .unwrap_or(usize::MAX);

    tracing::info!(
        output_dir = %config.output_dir().display(),
        metadata = %config.metadata_file().display(),
        "Storage configured"
    );

    let state = Arc::new(ServerState {
        chroma: Chroma::new(config),
    });
    server::start_server(state, &addr, max_upload_bytes).await
}
