//! Subcommand handlers.

pub mod config;
pub mod process;
pub mod query;
pub mod serve;

use clap::Args;
use std::path::PathBuf;

/// Storage overrides shared by commands that touch artifacts or the log.
#[derive(Args, Debug, Default)]
pub struct StorageArgs {
    /// Directory for uploads and derived images
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Metadata log file
    #[arg(long)]
    pub metadata: Option<PathBuf>,
}

impl StorageArgs {
    /// Apply the overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut chroma_core::Config) {
        if let Some(dir) = &self.output_dir {
            config.storage.output_dir = dir.clone();
        }
        if let Some(path) = &self.metadata {
            config.storage.metadata_file = path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_overrides() {
        let mut config = chroma_core::Config::default();
        let args = StorageArgs {
            output_dir: Some(PathBuf::from("/tmp/out")),
            metadata: None,
        };
        args.apply(&mut config);
        assert_eq!(config.storage.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(
            config.storage.metadata_file,
            PathBuf::from("image_metadata.csv")
        );
    }
}
