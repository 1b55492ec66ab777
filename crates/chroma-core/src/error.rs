//! Error types for the Chroma pipeline and metadata store.
//!
//! Errors are split by component so callers can tell a bad upload
//! (decode, dimensions) apart from an environment problem (writes, store).

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

/// Top-level error type for Chroma operations.
#[derive(Error, Debug)]
pub enum ChromaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A pipeline run aborted at `stage`; nothing was recorded
    #[error("Pipeline failed at {stage} stage: {source}")]
    Pipeline {
        stage: Stage,
        #[source]
        source: PipelineError,
    },

    /// Metadata store errors outside a pipeline run (queries)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ChromaError {
    /// The pipeline error behind this failure, if it came from a pipeline run.
    pub fn pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            Self::Pipeline { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while transforming an image or recording the result.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input bytes are not a decodable image
    #[error("Decode error for {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    /// A resize target dimension is zero
    #[error("Invalid resize target {width}x{height}: both dimensions must be > 0")]
    InvalidDimension { width: u32, height: u32 },

    /// An artifact could not be encoded or written
    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// Appending the record to the metadata log failed
    #[error("Failed to record metadata: {0}")]
    Record(#[from] StoreError),
}

impl PipelineError {
    /// True for errors caused by the input itself rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::InvalidDimension { .. })
    }
}

/// Metadata store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The log could not be opened or read
    #[error("Metadata store unavailable at {path}: {message}")]
    Unavailable { path: PathBuf, message: String },

    /// A record could not be written to the log
    #[error("Failed to append to metadata store {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Convenience type alias for Chroma results.
pub type Result<T> = std::result::Result<T, ChromaError>;

/// Convenience type alias for pipeline-stage results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
