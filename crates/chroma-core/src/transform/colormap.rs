//! Fixed false-color lookup for 8-bit luminance.
//!
//! The jet ramp runs dark blue → blue → cyan → green → yellow → red → dark red
//! across the full 0..=255 luminance range. The lookup is a pure function of
//! the luminance value: there is no per-image min/max normalisation.

use image::{GrayImage, Rgb, RgbImage};
use std::sync::OnceLock;

/// Piecewise-linear control points `(position, intensity)` per channel.
type Segments = &'static [(f64, f64)];

const JET_RED: Segments = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const JET_GREEN: Segments = &[
    (0.0, 0.0),
    (0.125, 0.0),
    (0.375, 1.0),
    (0.64, 1.0),
    (0.91, 0.0),
    (1.0, 0.0),
];
const JET_BLUE: Segments = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// A 256-entry RGB lookup table indexed by luminance.
#[derive(Debug, Clone)]
pub struct Colormap {
    lut: [[u8; 3]; 256],
}

impl Colormap {
    /// The shared jet colormap, built on first use.
    pub fn jet() -> &'static Colormap {
        static JET: OnceLock<Colormap> = OnceLock::new();
        JET.get_or_init(|| Colormap::from_segments(JET_RED, JET_GREEN, JET_BLUE))
    }

    fn from_segments(red: Segments, green: Segments, blue: Segments) -> Self {
        let mut lut = [[0u8; 3]; 256];
        for (i, entry) in lut.iter_mut().enumerate() {
            let x = i as f64 / 255.0;
            *entry = [
                to_channel(interpolate(red, x)),
                to_channel(interpolate(green, x)),
                to_channel(interpolate(blue, x)),
            ];
        }
        Self { lut }
    }

    /// Color for a single luminance sample.
    #[inline]
    pub fn lookup(&self, luma: u8) -> [u8; 3] {
        self.lut[luma as usize]
    }

    /// Map every sample of a grayscale image to color, keeping dimensions.
    pub fn apply(&self, gray: &GrayImage) -> RgbImage {
        let (width, height) = gray.dimensions();
        let mut out = RgbImage::new(width, height);
        for (dst, src) in out.pixels_mut().zip(gray.pixels()) {
            *dst = Rgb(self.lookup(src.0[0]));
        }
        out
    }
}

fn interpolate(points: Segments, x: f64) -> f64 {
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
            return y0 + t * (y1 - y0);
        }
    }
    points.last().map(|&(_, y)| y).unwrap_or(0.0)
}

/// Scale to 0..=255 and truncate, matching the reference float-to-u8 cast.
fn to_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
