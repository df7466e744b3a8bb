//! Raster rendering of classified cells and the cell mosaic.
//!
//! Each cell is drawn in the canonical frame, then the whole raster is
//! rotated by the pattern's orientation. Rotation happens after drawing:
//! the canonical geometry never moves, the pixels do. Corner markers are
//! overlaid after rotation since they are symmetric.

use image::{GrayImage, Luma, imageops};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use serde::{Deserialize, Serialize};

use crate::grid::PatternGrid;
use crate::pattern::Pattern;
use crate::types::{CELL_SIZE, ClassifierConfig};

/// Drawing parameters for cell rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Radius of the filled corner markers in pixels (`0` disables them).
    pub corner_radius: u32,
    /// Gray level used for segments and markers on a black background.
    pub ink: u8,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            corner_radius: ClassifierConfig::DEFAULT_CORNER_RADIUS,
            ink: u8::MAX,
        }
    }
}

impl From<&ClassifierConfig> for RenderStyle {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            corner_radius: config.corner_radius,
            ..Self::default()
        }
    }
}

/// Render one cell into a `CELL_SIZE`×`CELL_SIZE` raster.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn render_pattern(pattern: &Pattern, style: &RenderStyle) -> GrayImage {
    let ink = Luma([style.ink]);
    let mut canvas = GrayImage::new(CELL_SIZE, CELL_SIZE);

    for (start, end) in pattern.segments() {
        draw_line_segment_mut(
            &mut canvas,
            (start.x as f32, start.y as f32),
            (end.x as f32, end.y as f32),
            ink,
        );
    }

    let mut canvas = match pattern.orientation().quarter_turns() {
        0 => canvas,
        1 => imageops::rotate90(&canvas),
        2 => imageops::rotate180(&canvas),
        _ => imageops::rotate270(&canvas),
    };

    if style.corner_radius > 0 {
        let edge = i32::try_from(CELL_SIZE).unwrap_or(i32::MAX);
        let radius = i32::try_from(style.corner_radius).unwrap_or(i32::MAX);
        for center in [(0, 0), (edge, 0), (0, edge), (edge, edge)] {
            draw_filled_circle_mut(&mut canvas, center, radius, ink);
        }
    }

    canvas
}

/// Tile the rendered cells of `grid` into one raster, row-major, one
/// `CELL_SIZE` square per cell.
#[must_use]
pub fn compose_mosaic(grid: &PatternGrid, style: &RenderStyle) -> GrayImage {
    let dimensions = grid.pixel_dimensions();
    let mut mosaic = GrayImage::new(dimensions.width, dimensions.height);

    for (row, col, pattern) in grid.iter() {
        let tile = render_pattern(pattern, style);
        imageops::replace(&mut mosaic, &tile, tile_origin(col), tile_origin(row));
    }

    mosaic
}

/// Pixel offset of the tile at cell index `index`.
fn tile_origin(index: usize) -> i64 {
    i64::try_from(index)
        .unwrap_or(i64::MAX)
        .saturating_mul(i64::from(CELL_SIZE))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::field::{CellValues, CornerMask, ScalarField};

    fn no_markers() -> RenderStyle {
        RenderStyle {
            corner_radius: 0,
            ..RenderStyle::default()
        }
    }

    fn pattern(corners: [bool; 4]) -> Pattern {
        Pattern::new(
            CornerMask::new(corners),
            CellValues::new([0.0; 4]),
            0.0,
        )
        .unwrap()
    }

    fn lit(image: &GrayImage) -> usize {
        image.pixels().filter(|p| p.0[0] > 0).count()
    }

    /// Lit pixels inside the `quadrant` (0 = top-left, clockwise) of a tile.
    fn lit_in_quadrant(image: &GrayImage, quadrant: usize) -> usize {
        let half = CELL_SIZE / 2;
        let (x0, y0) = match quadrant {
            0 => (0, 0),
            1 => (half, 0),
            2 => (half, half),
            _ => (0, half),
        };
        (y0..y0 + half)
            .flat_map(|y| (x0..x0 + half).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y).0[0] > 0)
            .count()
    }

    #[test]
    fn empty_cell_renders_only_markers() {
        let blank = render_pattern(&pattern([false; 4]), &no_markers());
        assert_eq!(blank.dimensions(), (CELL_SIZE, CELL_SIZE));
        assert_eq!(lit(&blank), 0);

        let marked = render_pattern(&pattern([false; 4]), &RenderStyle::default());
        assert!(marked.get_pixel(0, 0).0[0] > 0);
        assert!(marked.get_pixel(CELL_SIZE - 1, CELL_SIZE - 1).0[0] > 0);
        assert_eq!(marked.get_pixel(25, 25).0[0], 0);
    }

    #[test]
    fn corner_cut_is_drawn_near_its_corner() {
        for corner in 0..4 {
            let mut corners = [false; 4];
            corners[corner] = true;
            let tile = render_pattern(&pattern(corners), &no_markers());
            assert!(lit(&tile) > 0, "corner {corner}");
            for quadrant in 0..4 {
                let count = lit_in_quadrant(&tile, quadrant);
                if quadrant == corner {
                    assert!(count > 0, "corner {corner} quadrant {quadrant}");
                } else {
                    assert!(count <= 2, "corner {corner} quadrant {quadrant}: {count}");
                }
            }
        }
    }

    #[test]
    fn rotation_happens_after_drawing() {
        let upright = render_pattern(&pattern([true, true, false, false]), &no_markers());
        let turned = render_pattern(&pattern([false, true, true, false]), &no_markers());
        assert_eq!(imageops::rotate90(&upright), turned);
    }

    #[test]
    fn adjacent_split_draws_a_horizontal_line() {
        let tile = render_pattern(&pattern([true, true, false, false]), &no_markers());
        assert!(tile.get_pixel(10, 25).0[0] > 0);
        assert!(tile.get_pixel(40, 25).0[0] > 0);
        assert_eq!(tile.get_pixel(25, 10).0[0], 0);
    }

    #[test]
    fn mosaic_has_one_tile_per_cell() {
        let grid = PatternGrid::classify(&ScalarField::demo(), 21.0, 0.0).unwrap();
        let mosaic = compose_mosaic(&grid, &RenderStyle::default());
        assert_eq!(mosaic.dimensions(), (150, 150));
    }

    #[test]
    fn mosaic_tiles_match_individual_renders() {
        let grid = PatternGrid::classify(&ScalarField::demo(), 21.0, 0.0).unwrap();
        let style = RenderStyle::default();
        let mosaic = compose_mosaic(&grid, &style);
        for (row, col, pattern) in grid.iter() {
            let tile = render_pattern(pattern, &style);
            let x0 = u32::try_from(col).unwrap() * CELL_SIZE;
            let y0 = u32::try_from(row).unwrap() * CELL_SIZE;
            for (x, y, pixel) in tile.enumerate_pixels() {
                assert_eq!(mosaic.get_pixel(x0 + x, y0 + y), pixel);
            }
        }
    }

    #[test]
    fn interpolation_changes_the_mosaic() {
        let grid = PatternGrid::classify(&ScalarField::demo(), 21.0, 0.0).unwrap();
        let style = RenderStyle::default();
        let before = compose_mosaic(&grid, &style);
        let after = compose_mosaic(&grid.interpolated(), &style);
        assert_eq!(before.dimensions(), after.dimensions());
        assert_ne!(before, after);
    }

    #[test]
    fn style_from_config_uses_corner_radius() {
        let config = ClassifierConfig {
            corner_radius: 5,
            ..ClassifierConfig::default()
        };
        assert_eq!(RenderStyle::from(&config).corner_radius, 5);
    }
}
