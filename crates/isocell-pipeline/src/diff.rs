//! Signed difference between two grayscale images.
//!
//! The difference `second − first` is kept in `f32` so negative values
//! survive, then min-max normalized into `[0, 255]`. From there it can be
//! exported losslessly as 16-bit luma, quantized to 8 bits, or pushed
//! through a [`Colormap`].

use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma};
use tracing::{debug, warn};

use crate::colormap::{Colormap, ColormapKind};
use crate::types::{Dimensions, DiffError, RgbImage};

/// Single-channel `f32` raster.
pub type GrayF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

/// 16-bit single-channel raster.
pub type Gray16 = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Upper bound of the normalized range.
const NORMALIZED_MAX: f32 = 255.0;

/// Read and decode an image file, converting it to 8-bit grayscale.
///
/// # Errors
///
/// Returns [`DiffError::Io`] if the file cannot be read, or any error
/// from [`decode_grayscale`].
pub fn load_grayscale(path: &Path) -> Result<GrayImage, DiffError> {
    let bytes = std::fs::read(path).map_err(|source| DiffError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_grayscale(&bytes)
}

/// Decode raw image bytes (any format `image` recognises) into 8-bit
/// grayscale.
///
/// # Errors
///
/// Returns [`DiffError::EmptyInput`] if `bytes` is empty, or
/// [`DiffError::ImageDecode`] if the format is unsupported or corrupt.
pub fn decode_grayscale(bytes: &[u8]) -> Result<GrayImage, DiffError> {
    if bytes.is_empty() {
        return Err(DiffError::EmptyInput);
    }
    Ok(image::load_from_memory(bytes)?.to_luma8())
}

fn dimensions_of(image: &GrayImage) -> Dimensions {
    let (width, height) = image.dimensions();
    Dimensions { width, height }
}

/// Per-pixel signed difference.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffField(GrayF32);

/// A difference rescaled into `[0, 255]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDiff(GrayF32);

/// Compute `second − first` per pixel.
///
/// # Errors
///
/// Returns [`DiffError::DimensionMismatch`] if the two images differ in
/// size.
pub fn signed_difference(first: &GrayImage, second: &GrayImage) -> Result<DiffField, DiffError> {
    if first.dimensions() != second.dimensions() {
        return Err(DiffError::DimensionMismatch {
            first: dimensions_of(first),
            second: dimensions_of(second),
        });
    }
    let (width, height) = first.dimensions();
    Ok(DiffField(GrayF32::from_fn(width, height, |x, y| {
        let a = f32::from(first.get_pixel(x, y).0[0]);
        let b = f32::from(second.get_pixel(x, y).0[0]);
        Luma([b - a])
    })))
}

impl DiffField {
    /// The raw signed values.
    #[must_use]
    pub const fn as_image(&self) -> &GrayF32 {
        &self.0
    }

    /// Smallest and largest difference, or `None` for an empty raster.
    #[must_use]
    pub fn range(&self) -> Option<(f32, f32)> {
        self.0.pixels().map(|p| p.0[0]).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Min-max normalize into `[0, 255]`: `255·(d − min)/(max − min)`.
    ///
    /// A flat difference has no range to stretch; it maps to all zeros.
    #[must_use]
    pub fn normalized(&self) -> NormalizedDiff {
        let (width, height) = self.0.dimensions();
        let Some((min, max)) = self.range().filter(|(lo, hi)| hi > lo) else {
            warn!(%width, %height, "difference is flat, normalizing to zero");
            return NormalizedDiff(GrayF32::new(width, height));
        };
        debug!(min, max, "normalizing difference");
        let scale = NORMALIZED_MAX / (max - min);
        NormalizedDiff(GrayF32::from_fn(width, height, |x, y| {
            Luma([(self.0.get_pixel(x, y).0[0] - min) * scale])
        }))
    }
}

impl NormalizedDiff {
    /// The normalized values, each in `[0, 255]`.
    #[must_use]
    pub const fn as_image(&self) -> &GrayF32 {
        &self.0
    }

    /// Full-precision export: `[0, 255]` stretched onto the 16-bit range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_luma16(&self) -> Gray16 {
        let (width, height) = self.0.dimensions();
        let scale = f32::from(u16::MAX) / NORMALIZED_MAX;
        Gray16::from_fn(width, height, |x, y| {
            let v = (self.0.get_pixel(x, y).0[0] * scale).round();
            Luma([v.clamp(0.0, f32::from(u16::MAX)) as u16])
        })
    }

    /// Round each value to the nearest 8-bit level, saturating.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn quantize(&self) -> GrayImage {
        let (width, height) = self.0.dimensions();
        GrayImage::from_fn(width, height, |x, y| {
            let v = self.0.get_pixel(x, y).0[0].round();
            Luma([v.clamp(0.0, NORMALIZED_MAX) as u8])
        })
    }
}

/// All outputs of one difference run.
#[derive(Debug, Clone)]
pub struct DiffResult {
    /// Normalized `f32` difference.
    pub normalized: NormalizedDiff,
    /// 8-bit quantized difference.
    pub quantized: GrayImage,
    /// Quantized difference passed through the colormap.
    pub colored: RgbImage,
}

/// Compute, normalize, quantize and color the difference of two images.
///
/// # Errors
///
/// Returns [`DiffError::DimensionMismatch`] if the images differ in size.
pub fn diff_images(
    first: &GrayImage,
    second: &GrayImage,
    colormap: ColormapKind,
) -> Result<DiffResult, DiffError> {
    let normalized = signed_difference(first, second)?.normalized();
    let quantized = normalized.quantize();
    let colored = colormap.apply(&quantized);
    Ok(DiffResult {
        normalized,
        quantized,
        colored,
    })
}
