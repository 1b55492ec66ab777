//! Decoding uploads and picking an encoder for artifacts.

use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Decode an in-memory image, detecting the format from its content.
///
/// `source_name` only labels errors; the extension is never trusted.
pub fn decode_bytes(bytes: &[u8], source_name: &str) -> PipelineResult<DynamicImage> {
    let decode_err = |message: String| PipelineError::Decode {
        source_name: source_name.to_string(),
        message,
    };

    if bytes.is_empty() {
        return Err(decode_err("empty input".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(format!("Cannot detect image format: {}", e)))?;
    if reader.format().is_none() {
        return Err(decode_err("Unrecognized image format".to_string()));
    }

    reader.decode().map_err(|e| decode_err(e.to_string()))
}

/// Encoder used for an artifact path, chosen by extension.
///
/// Unknown or read-only extensions fall back to PNG.
pub fn artifact_format(path: &Path) -> ImageFormat {
    match ImageFormat::from_path(path) {
        Ok(
            format @ (ImageFormat::Png
            | ImageFormat::Jpeg
            | ImageFormat::Bmp
            | ImageFormat::Gif
            | ImageFormat::Tiff
            | ImageFormat::WebP
            | ImageFormat::Pnm
            | ImageFormat::Tga),
        ) => format,
        _ => ImageFormat::Png,
    }
}

/// Canonical file extension for an encoder.
pub fn format_extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("png")
}
