//! Pipeline orchestration - one upload in, two artifacts and one record out.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{ChromaError, PipelineError, Result};
use crate::store::MetadataStore;
use crate::transform::ImageTransformer;
use crate::types::ImageRecord;

use super::naming::ArtifactPaths;
use super::staging::Staging;
use super::state::{PipelineState, Stage};

/// Runs the resize → false color → record cycle for single uploads.
pub struct Pipeline {
    transformer: ImageTransformer,
    store: Arc<MetadataStore>,
    output_dir: PathBuf,
    keep_uploads: bool,
}

/// Bookkeeping for one run: current state and files staged so far.
struct Run {
    state: PipelineState,
    staging: Staging,
}

impl Run {
    /// Move to the state after the next stage in the happy-path order.
    fn advance(&mut self) {
        if let Some(stage) = self.state.next_stage() {
            self.state = PipelineState::after(stage);
            tracing::trace!("  {} done, state {:?}", stage, self.state);
        }
    }
}

impl Pipeline {
    /// Create a pipeline writing artifacts under `storage.output_dir` and
    /// records into `store`.
    pub fn new(config: &Config, store: Arc<MetadataStore>) -> Self {
        Self {
            transformer: ImageTransformer::new(config.transform.clone()),
            store,
            output_dir: config.output_dir(),
            keep_uploads: config.storage.keep_uploads,
        }
    }

    /// The store records are appended to.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// The transformer used for both artifacts.
    pub fn transformer(&self) -> &ImageTransformer {
        &self.transformer
    }

    /// Process one upload.
    ///
    /// On success both artifacts exist and exactly one record was appended.
    /// On failure nothing is appended, files written by this run are removed,
    /// files it would have replaced are restored, and the error names the
    /// stage that failed.
    pub fn run(
        &self,
        bytes: &[u8],
        filename_hint: &str,
        width: u32,
        height: u32,
        depth: i64,
    ) -> Result<ImageRecord> {
        let start = Instant::now();
        let paths = ArtifactPaths::new(&self.output_dir, filename_hint);
        tracing::debug!("Processing: {:?} ({} bytes)", paths.filename, bytes.len());

        let mut run = Run {
            state: PipelineState::Received,
            staging: Staging::new(),
        };

        match self.execute(&mut run, &paths, bytes, width, height, depth) {
            Ok(record) => {
                tracing::info!(
                    filename = %record.filename,
                    depth = record.depth,
                    "Processed {:?} in {:?} ({}x{})",
                    record.filename,
                    start.elapsed(),
                    width,
                    height
                );
                Ok(record)
            }
            Err((stage, source)) => {
                run.state = PipelineState::Failed(stage);
                tracing::warn!(
                    filename = %paths.filename,
                    state = ?run.state,
                    "Pipeline aborted: {}",
                    source
                );
                run.staging.rollback();
                Err(ChromaError::Pipeline { stage, source })
            }
        }
    }

    fn execute(
        &self,
        run: &mut Run,
        paths: &ArtifactPaths,
        bytes: &[u8],
        width: u32,
        height: u32,
        depth: i64,
    ) -> std::result::Result<ImageRecord, (Stage, PipelineError)> {
        let at = |stage: Stage| move |e: PipelineError| (stage, e);

        // Received: reject bad targets before anything touches disk
        if width == 0 || height == 0 {
            return Err((
                Stage::Resize,
                PipelineError::InvalidDimension { width, height },
            ));
        }
        if self.keep_uploads {
            let staged = run.staging.stage(&paths.upload);
            write_upload(&staged, bytes).map_err(at(Stage::Receive))?;
        }

        let source = self
            .transformer
            .decode(bytes, &paths.filename)
            .map_err(at(Stage::Decode))?;

        // Resized
        let staged = run.staging.stage(&paths.processed);
        let resized = self
            .transformer
            .resize_to(&source, width, height, &staged)
            .map_err(at(Stage::Resize))?;
        run.advance();

        // Colormapped
        let staged = run.staging.stage(&paths.colormap);
        self.transformer
            .false_color_to(&resized, &staged)
            .map_err(at(Stage::Colormap))?;
        run.advance();

        // Recorded: artifacts go in place first so the record never points
        // at a missing file
        let record = ImageRecord {
            filename: paths.filename.clone(),
            processed_path: path_field(&paths.processed),
            colormap_path: path_field(&paths.colormap),
            width,
            height,
            depth,
        };
        run.staging.promote().map_err(at(Stage::Record))?;
        self.store
            .append(&record)
            .map_err(|e| (Stage::Record, PipelineError::Record(e)))?;
        run.staging.commit();
        run.advance();

        Ok(record)
    }
}

fn write_upload(path: &Path, bytes: &[u8]) -> std::result::Result<(), PipelineError> {
    let write_err = |e: std::io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bytes).map_err(write_err)
}

/// Path as stored in the log. The output directory may carry characters the
/// log cannot hold even though the file name was already sanitized.
fn path_field(path: &Path) -> String {
    crate::store::codec::sanitize_field(&path.to_string_lossy())
}
