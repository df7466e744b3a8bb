//! Shared types for the isocell pipeline.

use serde::{Deserialize, Serialize};

use crate::colormap::ColormapKind;
use crate::field::{CornerMask, MaskGrid};
use crate::grid::PatternGrid;

/// Re-export `GrayImage` so downstream crates can reference rendered
/// rasters without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` for color-mapped difference output.
pub use image::RgbImage;

/// Edge length of the canonical cell frame, in pixels.
///
/// Every cell is drawn into a square raster of this size before it is
/// rotated into place and tiled into the mosaic.
pub const CELL_SIZE: u32 = 50;

/// [`CELL_SIZE`] as a coordinate-space length.
pub const CELL_EDGE: f64 = 50.0;

/// A 2D point in canonical-frame coordinates (+Y pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from the left edge).
    pub x: f64,
    /// Vertical position (pixels from the top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Rotate clockwise by `quarter_turns` × 90° about the centre of a
    /// square frame with side `size`.
    ///
    /// This is the coordinate-space counterpart of rotating a
    /// `size`×`size` raster: the top-left corner moves to the top-right
    /// after one quarter turn.
    #[must_use]
    pub fn rotated_cw(self, quarter_turns: u8, size: f64) -> Self {
        match quarter_turns % 4 {
            0 => self,
            1 => Self::new(size - self.y, self.x),
            2 => Self::new(size - self.x, size - self.y),
            _ => Self::new(self.y, size - self.x),
        }
    }

    /// Translate by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for the cell classifier run.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// partial JSON document such as `{"alpha": 18.5}` is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Iso-value the corners are thresholded against (`value > alpha`).
    pub alpha: f64,

    /// Half-width of the band around zero in which the asymptotic
    /// decider reports `D = 0`.
    ///
    /// `0.0` reproduces the exact comparison; the zero branch is then
    /// only reachable by exact floating-point coincidence.
    pub decider_tolerance: f64,

    /// Radius in pixels of the corner markers drawn on every cell tile.
    /// `0` disables the markers.
    pub corner_radius: u32,
}

impl ClassifierConfig {
    /// Default iso-value of the built-in demonstration field.
    pub const DEFAULT_ALPHA: f64 = 21.0;
    /// Default decider tolerance (exact comparison).
    pub const DEFAULT_DECIDER_TOLERANCE: f64 = 0.0;
    /// Default corner marker radius in pixels.
    pub const DEFAULT_CORNER_RADIUS: u32 = 2;

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteAlpha`] if `alpha` is NaN or infinite.
    /// Returns [`ConfigError::InvalidTolerance`] if `decider_tolerance` is
    /// negative or not finite.
    /// Returns [`ConfigError::CornerRadiusTooLarge`] if the markers would
    /// cover more than half a cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alpha.is_finite() {
            return Err(ConfigError::NonFiniteAlpha(self.alpha));
        }
        if !self.decider_tolerance.is_finite() || self.decider_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.decider_tolerance));
        }
        if self.corner_radius > CELL_SIZE / 2 {
            return Err(ConfigError::CornerRadiusTooLarge(self.corner_radius));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            decider_tolerance: Self::DEFAULT_DECIDER_TOLERANCE,
            corner_radius: Self::DEFAULT_CORNER_RADIUS,
        }
    }
}

/// Output of a full classifier run.
#[derive(Debug, Clone)]
pub struct ClassifierResult {
    /// Corner flags of every sample (`value > alpha`).
    pub mask: MaskGrid,
    /// Classified cells with midpoint geometry.
    pub patterns: PatternGrid,
    /// Classified cells with interpolated geometry.
    pub interpolated: PatternGrid,
    /// Mosaic of `patterns`.
    pub plain_mosaic: GrayImage,
    /// Mosaic of `interpolated`.
    pub interpolated_mosaic: GrayImage,
}

/// Configuration for the image difference run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Lookup table applied to the quantized difference.
    pub colormap: ColormapKind,
}

/// Errors raised while building a [`ScalarField`](crate::ScalarField).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The field has fewer than two rows or columns, so it has no cells.
    #[error("scalar field must be at least 2x2, got {rows}x{cols}")]
    TooSmall {
        /// Number of rows supplied.
        rows: usize,
        /// Number of columns in the first row.
        cols: usize,
    },

    /// A row has a different length than the first row.
    #[error("row {row} has {found} samples, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
}

/// Errors raised by the corner-pattern classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// A two-corner mask matched neither the adjacent nor the diagonal rule.
    ///
    /// Unreachable for a well-formed four-corner mask; surfaced as a hard
    /// error so a broken invariant never leaves a cell blank.
    #[error("corner mask {mask} matched no two-corner configuration")]
    Unclassified {
        /// The mask that failed to classify.
        mask: CornerMask,
    },
}

/// Invalid configuration values.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The iso-value is NaN or infinite.
    #[error("alpha must be finite, got {0}")]
    NonFiniteAlpha(f64),

    /// The decider tolerance is negative or not finite.
    #[error("decider tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    /// The corner markers would be larger than half a cell.
    #[error("corner radius {0} exceeds half the cell size")]
    CornerRadiusTooLarge(u32),
}

/// Errors that can occur while computing an image difference.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Failed to read an input file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to decode an input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The two inputs do not have the same size.
    #[error("image dimensions differ: {first} vs {second}")]
    DimensionMismatch {
        /// Size of the first (reference) image.
        first: Dimensions,
        /// Size of the second (approximation) image.
        second: Dimensions,
    },
}

/// Errors from a full classifier run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The scalar field is malformed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A cell could not be classified.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    // --- Point tests ---

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert!((a.distance_squared(b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn quarter_turn_moves_top_left_to_top_right() {
        let p = Point::new(0.0, 0.0).rotated_cw(1, CELL_EDGE);
        assert_eq!(p, Point::new(CELL_EDGE, 0.0));
    }

    #[test]
    fn quarter_turns_visit_corners_clockwise() {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(CELL_EDGE, 0.0),
            Point::new(CELL_EDGE, CELL_EDGE),
            Point::new(0.0, CELL_EDGE),
        ];
        for (i, &corner) in corners.iter().enumerate() {
            for turns in 0..4u8 {
                let expected = corners[(i + usize::from(turns)) % 4];
                assert_eq!(corner.rotated_cw(turns, CELL_EDGE), expected);
            }
        }
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let p = Point::new(12.5, 40.0);
        let mut q = p;
        for _ in 0..4 {
            q = q.rotated_cw(1, CELL_EDGE);
        }
        assert_eq!(p, q);
        assert_eq!(p.rotated_cw(4, CELL_EDGE), p);
    }

    #[test]
    fn rotation_keeps_centre_fixed() {
        let centre = Point::new(CELL_EDGE / 2.0, CELL_EDGE / 2.0);
        for turns in 0..4 {
            assert_eq!(centre.rotated_cw(turns, CELL_EDGE), centre);
        }
    }

    // --- Config tests ---

    #[test]
    fn default_config_is_valid() {
        assert!(ClassifierConfig::default().validate().is_ok());
    }

    #[test]
    fn nan_alpha_is_rejected() {
        let config = ClassifierConfig {
            alpha: f64::NAN,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteAlpha(_))
        ));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let config = ClassifierConfig {
            decider_tolerance: -1.0,
            ..ClassifierConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTolerance(-1.0))
        );
    }

    #[test]
    fn oversized_corner_radius_is_rejected() {
        let config = ClassifierConfig {
            corner_radius: 40,
            ..ClassifierConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CornerRadiusTooLarge(40))
        );
    }

    #[test]
    fn partial_config_json_uses_defaults() {
        let config: ClassifierConfig = serde_json::from_str(r#"{"alpha": 18.5}"#).unwrap();
        assert_eq!(config.alpha, 18.5);
        assert_eq!(
            config.corner_radius,
            ClassifierConfig::DEFAULT_CORNER_RADIUS
        );
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = ClassifierConfig {
            alpha: 3.25,
            decider_tolerance: 1e-9,
            corner_radius: 0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn dimension_mismatch_message_names_both_sizes() {
        let err = DiffError::DimensionMismatch {
            first: Dimensions {
                width: 4,
                height: 3,
            },
            second: Dimensions {
                width: 5,
                height: 3,
            },
        };
        assert_eq!(err.to_string(), "image dimensions differ: 4x3 vs 5x3");
    }
}
