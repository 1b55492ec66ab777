//! Append-only metadata log with a linear depth-range query.
//!
//! The store owns a single flat file. Writers are serialised by an in-process
//! lock and each append lands as one buffer, header included when the log is
//! new. Readers take no lock: they read the whole file and ignore an
//! unterminated trailing line, so an in-flight append is never observed.

pub mod codec;

use std::fs::OpenOptions;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;
use crate::types::{DepthRange, ImageRecord};

/// Durable, append-only log of [`ImageRecord`]s.
pub struct MetadataStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MetadataStore {
    /// Create a store backed by the log at `path`. Nothing is touched on disk
    /// until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the log with its header if needed.
    ///
    /// Duplicate filenames are accepted; nothing is deduplicated.
    pub fn append(&self, record: &ImageRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;
        let len = file.metadata().map_err(|e| self.unavailable(e))?.len();

        let mut buffer = String::new();
        if len == 0 {
            buffer.push_str(&codec::header());
            buffer.push('\n');
        } else if !ends_with_newline(&mut file, len).map_err(|e| self.unavailable(e))? {
            // Seal a torn line left by an interrupted writer so this record
            // starts on its own line
            buffer.push('\n');
        }
        buffer.push_str(&codec::encode(record));

        file.write_all(buffer.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| StoreError::Write {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            filename = %record.filename,
            depth = record.depth,
            "Appended record to {:?}",
            self.path
        );
        Ok(())
    }

    /// Every complete record, oldest first.
    ///
    /// A log that does not exist yet is an empty store, not an error.
    pub fn records(&self) -> Result<Vec<ImageRecord>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.unavailable(e)),
        };
        let content = String::from_utf8_lossy(&bytes);

        let mut records = Vec::new();
        for (index, line) in content.split_inclusive('\n').enumerate() {
            let Some(line) = line.strip_suffix('\n') else {
                tracing::debug!("Ignoring unterminated trailing line in {:?}", self.path);
                break;
            };
            if line.trim().is_empty() || codec::is_header(line) {
                continue;
            }
            match codec::decode(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    line = index + 1,
                    "Skipping malformed record in {:?}: {}",
                    self.path,
                    e
                ),
            }
        }
        Ok(records)
    }

    /// Records whose depth lies in `min..=max`, in append order.
    ///
    /// `min > max` is not validated and simply matches nothing.
    pub fn query_by_depth_range(&self, min: i64, max: i64) -> Result<Vec<ImageRecord>, StoreError> {
        self.query(DepthRange::new(min, max))
    }

    /// Records whose depth lies in `range`, in append order.
    pub fn query(&self, range: DepthRange) -> Result<Vec<ImageRecord>, StoreError> {
        if range.is_inverted() {
            return Ok(Vec::new());
        }
        let mut records = self.records()?;
        records.retain(|record| range.contains(record.depth));
        Ok(records)
    }

    /// Number of complete records in the log.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records()?.len())
    }

    fn unavailable(&self, e: std::io::Error) -> StoreError {
        StoreError::Unavailable {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}

fn ends_with_newline(file: &mut std::fs::File, len: u64) -> std::io::Result<bool> {
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
