//! Chroma Core - resize, false-color and depth-indexed metadata for uploads.
//!
//! Every upload goes through a fixed pipeline and leaves exactly one record
//! in a flat append-only log, which can then be filtered by depth:
//!
//! ```text
//! bytes → Decode → Resize (150x110) → Jet colormap → Append record
//!                                                        ↓
//!                                   query_by_depth_range(min, max)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use chroma_core::{Chroma, Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let chroma = Chroma::new(Config::load()?);
//!
//!     let bytes = std::fs::read("./leaf.jpg")?;
//!     let record = chroma.run_pipeline(&bytes, "leaf.jpg", Some(120))?;
//!     println!("Colormap at {}", record.colormap_path);
//!
//!     let hits = chroma.query_by_depth_range(100, 150)?;
//!     println!("{} images between depth 100 and 150", hits.len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod transform;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ChromaError, ConfigError, PipelineError, PipelineResult, Result, StoreError};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{Pipeline, PipelineState, Stage};
pub use store::MetadataStore;
pub use transform::ImageTransformer;
pub use types::{DepthRange, ImageRecord};

use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entry point tying the pipeline and the metadata store to one configuration.
pub struct Chroma {
    config: Config,
    pipeline: Pipeline,
    store: Arc<MetadataStore>,
}

impl Chroma {
    /// Create a new instance; the store location comes from the config.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing Chroma v{}", VERSION);
        let store = Arc::new(MetadataStore::new(config.metadata_file()));
        let pipeline = Pipeline::new(&config, Arc::clone(&store));
        Self {
            config,
            pipeline,
            store,
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The metadata store backing this instance.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Process an upload at the configured target size.
    ///
    /// `depth` falls back to `transform.default_depth` when `None`.
    pub fn run_pipeline(
        &self,
        bytes: &[u8],
        filename_hint: &str,
        depth: Option<i64>,
    ) -> Result<ImageRecord> {
        let (width, height) = self.pipeline.transformer().target_dimensions();
        self.run_pipeline_with(bytes, filename_hint, width, height, depth)
    }

    /// Process an upload at an explicit target size.
    pub fn run_pipeline_with(
        &self,
        bytes: &[u8],
        filename_hint: &str,
        width: u32,
        height: u32,
        depth: Option<i64>,
    ) -> Result<ImageRecord> {
        let depth = depth.unwrap_or(self.config.transform.default_depth);
        self.pipeline
            .run(bytes, filename_hint, width, height, depth)
    }

    /// Records with `min <= depth <= max`, oldest first.
    ///
    /// An inverted range or a store with no appends yet gives an empty list.
    pub fn query_by_depth_range(&self, min: i64, max: i64) -> Result<Vec<ImageRecord>> {
        Ok(self.store.query_by_depth_range(min, max)?)
    }
}
