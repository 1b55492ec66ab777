//! Run-scoped artifact staging.
//!
//! Each artifact is written next to its final location under a hidden,
//! run-unique name and only moved into place once every stage succeeded.
//! Files already at a destination are set aside until the record is
//! appended, so an aborted run leaves earlier artifacts untouched.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::PipelineError;

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Files written by one run, promoted into place together.
pub(crate) struct Staging {
    token: String,
    files: Vec<StagedFile>,
}

struct StagedFile {
    staged: PathBuf,
    dest: PathBuf,
    backup: Option<PathBuf>,
    promoted: bool,
}

impl Staging {
    pub(crate) fn new() -> Self {
        let run = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            token: format!("{}-{}", std::process::id(), run),
            files: Vec::new(),
        }
    }

    /// Reserve a staging path for `dest`. The caller writes the file there.
    ///
    /// The staged name keeps the destination's extension so encoders can be
    /// picked from it.
    pub(crate) fn stage(&mut self, dest: &Path) -> PathBuf {
        let staged = self.sibling(dest, "part");
        self.files.push(StagedFile {
            staged: staged.clone(),
            dest: dest.to_path_buf(),
            backup: None,
            promoted: false,
        });
        staged
    }

    /// Move every staged file to its destination, setting aside whatever
    /// was there before.
    pub(crate) fn promote(&mut self) -> Result<(), PipelineError> {
        for index in 0..self.files.len() {
            let backup = self.sibling(&self.files[index].dest, "prev");
            let file = &mut self.files[index];

            if file.dest.exists() {
                std::fs::rename(&file.dest, &backup).map_err(|e| write_error(&file.dest, e))?;
                file.backup = Some(backup);
            }
            std::fs::rename(&file.staged, &file.dest).map_err(|e| write_error(&file.dest, e))?;
            file.promoted = true;
        }
        Ok(())
    }

    /// Keep the promoted files and drop the set-aside copies.
    pub(crate) fn commit(&mut self) {
        for file in self.files.drain(..) {
            if let Some(backup) = &file.backup {
                remove_quietly(backup);
            }
        }
    }

    /// Remove everything this run wrote and restore set-aside files.
    pub(crate) fn rollback(&mut self) {
        for file in self.files.drain(..).rev() {
            let written = if file.promoted {
                &file.dest
            } else {
                &file.staged
            };
            remove_quietly(written);

            if let Some(backup) = &file.backup {
                if let Err(e) = std::fs::rename(backup, &file.dest) {
                    tracing::warn!("Could not restore {:?} from {:?}: {}", file.dest, backup, e);
                }
            }
        }
    }

    fn sibling(&self, dest: &Path, tag: &str) -> PathBuf {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        dest.with_file_name(format!(".{tag}-{}-{name}", self.token))
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        // No-op after commit or rollback
        self.rollback();
    }
}

fn write_error(path: &Path, e: std::io::Error) -> PipelineError {
    PipelineError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not remove partial artifact {:?}: {}", path, e),
    }
}
