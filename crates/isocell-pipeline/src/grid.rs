//! The grid of classified cells covering a scalar field.

use serde::Serialize;
use tracing::debug;

use crate::field::ScalarField;
use crate::pattern::Pattern;
use crate::types::{CELL_SIZE, Dimensions, PatternError};

/// One [`Pattern`] per cell of a [`ScalarField`], stored row-major.
///
/// A field of `r × c` samples yields `(r − 1) × (c − 1)` patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternGrid {
    rows: usize,
    cols: usize,
    patterns: Vec<Pattern>,
}

impl PatternGrid {
    /// Classify every cell of `field` at iso-value `alpha`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] raised by any cell.
    pub fn classify(
        field: &ScalarField,
        alpha: f64,
        tolerance: f64,
    ) -> Result<Self, PatternError> {
        let mask = field.mask(alpha);
        let (rows, cols) = field.cell_shape();
        let mut patterns = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                // Both lookups are in range by construction of `cell_shape`.
                let (Some(corners), Some(values)) =
                    (mask.cell_mask(row, col), field.cell_values(row, col))
                else {
                    continue;
                };
                let pattern = Pattern::with_tolerance(corners, values, alpha, tolerance)?;
                debug!(row, col, mask = %corners, %pattern, "classified cell");
                patterns.push(pattern);
            }
        }

        Ok(Self {
            rows,
            cols,
            patterns,
        })
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Pattern of the cell at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Pattern> {
        if row < self.rows && col < self.cols {
            self.patterns.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// All patterns with their `(row, col)` position, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Pattern)> + '_ {
        let cols = self.cols;
        self.patterns
            .iter()
            .enumerate()
            .map(move |(i, p)| (i / cols, i % cols, p))
    }

    /// A copy of the grid with every pattern interpolated.
    #[must_use]
    pub fn interpolated(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            patterns: self.patterns.iter().map(Pattern::interpolated).collect(),
        }
    }

    /// Size of the mosaic this grid renders to, in pixels.
    #[must_use]
    pub fn pixel_dimensions(&self) -> Dimensions {
        let span = |cells: usize| u32::try_from(cells).map_or(u32::MAX, |n| n.saturating_mul(CELL_SIZE));
        Dimensions {
            width: span(self.cols),
            height: span(self.rows),
        }
    }
}
