//! isocell-pipeline: Pure marching-squares cell classification (sans-IO).
//!
//! Turns a scalar field into per-cell contour patterns through:
//! threshold mask -> topology classification (with the asymptotic
//! decider for saddles) -> optional linear interpolation -> per-cell
//! raster -> mosaic.
//!
//! It also hosts the grayscale image difference used alongside the
//! classifier: signed difference -> min-max normalization -> 8-bit
//! quantization -> colormap.
//!
//! Apart from [`diff::load_grayscale`] this crate has **no I/O** -- it
//! operates on in-memory data and returns structured results. Writing
//! files lives in the binaries and in `isocell-export`.

pub mod colormap;
pub mod decider;
pub mod diff;
pub mod field;
pub mod grid;
pub mod interpolate;
pub mod pattern;
pub mod render;
pub mod report;
pub mod types;

pub use colormap::{Colormap, ColormapKind};
pub use decider::Resolution;
pub use diff::{DiffResult, diff_images};
pub use field::{CellValues, CornerMask, MaskGrid, ScalarField};
pub use grid::PatternGrid;
pub use pattern::{Edge, Geometry, Orientation, Pattern, TopologyClass};
pub use render::RenderStyle;
pub use report::{JsonReport, Report};
pub use types::{
    CELL_EDGE, CELL_SIZE, ClassifierConfig, ClassifierResult, ConfigError, DiffConfig, DiffError,
    Dimensions, FieldError, PatternError, PipelineError, Point,
};

use tracing::info;

/// Run the full classifier on `field`.
///
/// # Pipeline steps
///
/// 1. Validate the configuration
/// 2. Threshold every sample against `alpha`
/// 3. Classify every cell (midpoint geometry)
/// 4. Interpolate every cell
/// 5. Render both grids into mosaics
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if the configuration is invalid.
/// Returns [`PipelineError::Pattern`] if a cell cannot be classified.
pub fn run_classifier(
    field: &ScalarField,
    config: &ClassifierConfig,
) -> Result<ClassifierResult, PipelineError> {
    // 1. Configuration.
    config.validate()?;

    // 2. Threshold mask.
    let mask = field.mask(config.alpha);

    // 3. Classification.
    let patterns = PatternGrid::classify(field, config.alpha, config.decider_tolerance)?;

    // 4. Interpolation.
    let interpolated = patterns.interpolated();

    // 5. Rendering.
    let style = RenderStyle::from(config);
    let plain_mosaic = render::compose_mosaic(&patterns, &style);
    let interpolated_mosaic = render::compose_mosaic(&interpolated, &style);

    info!(
        rows = patterns.rows(),
        cols = patterns.cols(),
        above = mask.count_above(),
        size = %patterns.pixel_dimensions(),
        "classified field"
    );

    Ok(ClassifierResult {
        mask,
        patterns,
        interpolated,
        plain_mosaic,
        interpolated_mosaic,
    })
}
