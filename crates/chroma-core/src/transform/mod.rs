//! Image transforms: exact resize and jet false-color rendering.
//!
//! - **decode**: content-sniffed decoding of uploads, artifact encoder choice
//! - **colormap**: the fixed luminance → RGB lookup
//!
//! Both transforms are deterministic. The only side effect is the optional
//! write of the result to a caller-supplied path.

pub mod colormap;
pub mod decode;

pub use colormap::Colormap;
pub use decode::{artifact_format, decode_bytes};

use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use std::path::Path;

use crate::config::TransformConfig;
use crate::error::{PipelineError, PipelineResult};

/// Resizes images and renders them in false color.
pub struct ImageTransformer {
    config: TransformConfig,
}

impl ImageTransformer {
    /// Create a new transformer with the given configuration.
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    /// Decode raw upload bytes.
    pub fn decode(&self, bytes: &[u8], source_name: &str) -> PipelineResult<DynamicImage> {
        decode_bytes(bytes, source_name)
    }

    /// Resize to exactly `width` x `height`, ignoring the source aspect ratio.
    pub fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> PipelineResult<DynamicImage> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimension { width, height });
        }
        Ok(image.resize_exact(width, height, self.config.filter.into()))
    }

    /// Grayscale-reduce the image and map each sample through the jet ramp.
    pub fn apply_false_color(&self, image: &DynamicImage) -> RgbImage {
        Colormap::jet().apply(&grayscale(image))
    }

    /// Resize and persist the result to `dest`.
    pub fn resize_to(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        dest: &Path,
    ) -> PipelineResult<DynamicImage> {
        let resized = self.resize(image, width, height)?;
        save(&resized, dest)?;
        Ok(resized)
    }

    /// Render in false color and persist the result to `dest`.
    pub fn false_color_to(&self, image: &DynamicImage, dest: &Path) -> PipelineResult<RgbImage> {
        let colored = self.apply_false_color(image);
        save(&DynamicImage::ImageRgb8(colored.clone()), dest)?;
        Ok(colored)
    }

    /// Configured resize target.
    pub fn target_dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

/// Encode `image` by the extension of `dest` and write it, creating parent
/// directories as needed.
pub fn save(image: &DynamicImage, dest: &Path) -> PipelineResult<()> {
    let write_err = |message: String| PipelineError::Write {
        path: dest.to_path_buf(),
        message,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let format = artifact_format(dest);
    encodable(image, format)
        .save_with_format(dest, format)
        .map_err(|e| write_err(e.to_string()))?;

    tracing::trace!("Wrote {:?} as {:?}", dest, format);
    Ok(())
}

/// ITU-R 601-2 luma, `L = (19595 R + 38470 G + 7471 B + 2^15) >> 16`.
///
/// These are the weights classic imaging tools use for an "L" conversion, so
/// false-color output matches renderings of the same upload made elsewhere.
/// `DynamicImage::to_luma8` uses Rec. 709 weights and would shift colored
/// pixels along the ramp. Alpha is ignored.
pub fn grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        // Already single-channel, the weights sum to 1
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        _ => {
            let rgb = image.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                let luma = 19595 * u32::from(r) + 38470 * u32::from(g) + 7471 * u32::from(b);
                Luma([((luma + 0x8000) >> 16) as u8])
            })
        }
    }
}

/// Reduce to 8-bit RGB(A) so every writable format accepts the buffer.
/// JPEG carries no alpha channel.
fn encodable(image: &DynamicImage, format: ImageFormat) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image.clone(),
        DynamicImage::ImageRgba8(_) if format != ImageFormat::Jpeg => image.clone(),
        _ if format == ImageFormat::Jpeg || !image.color().has_alpha() => {
            DynamicImage::ImageRgb8(image.to_rgb8())
        }
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}
