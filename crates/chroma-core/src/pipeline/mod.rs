//! The upload-to-record pipeline.
//!
//! - **state**: stages and the `Received → Resized → Colormapped → Recorded` machine
//! - **naming**: artifact paths derived from the upload's filename hint
//! - **processor**: runs one upload through every stage
//! - **staging**: artifacts written aside and moved into place on success

pub mod naming;
pub mod processor;
mod staging;
pub mod state;

// Re-exports for convenient access
pub use naming::{ArtifactPaths, UPLOADS_DIR};
pub use processor::Pipeline;
pub use state::{PipelineState, Stage};
