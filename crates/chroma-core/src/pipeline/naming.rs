//! Artifact locations derived from an upload's filename hint.

use std::path::{Path, PathBuf};

use crate::store::codec::sanitize_field;
use crate::transform::decode::{artifact_format, format_extension};

/// Subdirectory of the output directory holding upload copies, kept apart
/// from derived artifacts so an upload named `x_processed.png` cannot land
/// on the resized image of `x.png`.
pub const UPLOADS_DIR: &str = "uploads";

/// Where one run writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Sanitized bare file name recorded in the log
    pub filename: String,
    /// Copy of the uploaded bytes, under [`UPLOADS_DIR`]
    pub upload: PathBuf,
    /// Resized image
    pub processed: PathBuf,
    /// False-color image
    pub colormap: PathBuf,
}

impl ArtifactPaths {
    /// Derive paths inside `output_dir` for the hint `photo.jpg`:
    /// `uploads/photo.jpg`, `photo_processed.jpg`, `photo_colormap.jpg`.
    ///
    /// Directory components of the hint are dropped. Extensions without a
    /// writable encoder produce PNG artifacts.
    pub fn new(output_dir: &Path, filename_hint: &str) -> Self {
        let filename = bare_name(filename_hint);
        let as_path = Path::new(&filename);

        let stem = as_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("upload");
        let format = artifact_format(as_path);
        let extension = as_path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| {
                format
                    .extensions_str()
                    .contains(&e.to_ascii_lowercase().as_str())
            })
            .map(str::to_string)
            .unwrap_or_else(|| format_extension(format).to_string());

        Self {
            upload: output_dir.join(UPLOADS_DIR).join(&filename),
            processed: output_dir.join(format!("{stem}_processed.{extension}")),
            colormap: output_dir.join(format!("{stem}_colormap.{extension}")),
            filename,
        }
    }
}

/// Last path component of the hint, made safe for the log format.
fn bare_name(hint: &str) -> String {
    let last = hint
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .unwrap_or("upload");
    sanitize_field(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpg_hint() {
        let paths = ArtifactPaths::new(Path::new("resized_images"), "cat.jpg");
        assert_eq!(paths.filename, "cat.jpg");
        assert_eq!(paths.upload, PathBuf::from("resized_images/uploads/cat.jpg"));
        assert_eq!(
            paths.processed,
            PathBuf::from("resized_images/cat_processed.jpg")
        );
        assert_eq!(
            paths.colormap,
            PathBuf::from("resized_images/cat_colormap.jpg")
        );
    }

    #[test]
    fn test_extension_case_is_kept() {
        let paths = ArtifactPaths::new(Path::new("out"), "IMG_001.PNG");
        assert_eq!(paths.processed, PathBuf::from("out/IMG_001_processed.PNG"));
    }

    #[test]
    fn test_unknown_extension_falls_back_to_png() {
        let paths = ArtifactPaths::new(Path::new("out"), "scan.heic");
        assert_eq!(paths.processed, PathBuf::from("out/scan_processed.png"));
        assert_eq!(paths.colormap, PathBuf::from("out/scan_colormap.png"));
    }

    #[test]
    fn test_missing_extension() {
        let paths = ArtifactPaths::new(Path::new("out"), "blob");
        assert_eq!(paths.processed, PathBuf::from("out/blob_processed.png"));
    }

    #[test]
    fn test_directory_components_are_dropped() {
        let paths = ArtifactPaths::new(Path::new("out"), "../../etc/passwd.png");
        assert_eq!(paths.filename, "passwd.png");
        assert_eq!(paths.upload, PathBuf::from("out/uploads/passwd.png"));

        let paths = ArtifactPaths::new(Path::new("out"), "C:\\Users\\me\\shot.bmp");
        assert_eq!(paths.filename, "shot.bmp");
    }

    #[test]
    fn test_empty_hint() {
        let paths = ArtifactPaths::new(Path::new("out"), "");
        assert_eq!(paths.filename, "upload");
        assert_eq!(paths.processed, PathBuf::from("out/upload_processed.png"));
    }

    #[test]
    fn test_upload_copy_never_shares_a_derived_path() {
        let first = ArtifactPaths::new(Path::new("out"), "cat.png");
        let second = ArtifactPaths::new(Path::new("out"), "cat_processed.png");
        assert_ne!(second.upload, first.processed);
        assert_ne!(second.processed, first.processed);
    }

    #[test]
    fn test_delimiters_are_replaced() {
        let paths = ArtifactPaths::new(Path::new("out"), "a,b.jpg");
        assert_eq!(paths.filename, "a_b.jpg");
        assert_eq!(paths.processed, PathBuf::from("out/a_b_processed.jpg"));
    }
}
