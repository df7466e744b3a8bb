//! Scalar field storage and per-cell corner extraction.
//!
//! A [`ScalarField`] is sampled on a regular grid. Every 2×2 block of
//! neighbouring samples forms a cell whose four corners are read
//! clockwise from the top-left:
//!
//! ```text
//! 0 ──── 1
//! │      │
//! 3 ──── 2
//! ```
//!
//! [`CornerMask`] and [`CellValues`] always use this order, and the
//! rotation logic downstream depends on it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::FieldError;

/// Number of corners of a grid cell.
pub const CORNERS: usize = 4;

/// Immutable rectangular grid of samples, indexed by `(row, col)`.
///
/// Serializes as an array of rows. Deserialization validates the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ScalarField {
    rows: usize,
    cols: usize,
    samples: Vec<f64>,
}

impl ScalarField {
    /// Build a field from a list of equally sized rows.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TooSmall`] if there are fewer than two rows
    /// or columns, and [`FieldError::Ragged`] if any row length differs
    /// from the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, FieldError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.len() < 2 || cols < 2 {
            return Err(FieldError::TooSmall {
                rows: rows.len(),
                cols,
            });
        }
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find_map(|(i, r)| (r.len() != cols).then_some((i, r.len())))
        {
            return Err(FieldError::Ragged {
                row,
                expected: cols,
                found,
            });
        }

        let row_count = rows.len();
        Ok(Self {
            rows: row_count,
            cols,
            samples: rows.into_iter().flatten().collect(),
        })
    }

    /// The 4×4 demonstration field used when no field file is given.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            rows: 4,
            cols: 4,
            samples: vec![
                12.0, 14.0, 25.0, 20.0, //
                20.0, 16.0, 20.0, 18.0, //
                16.0, 22.0, 15.0, 17.0, //
                24.0, 20.0, 13.0, 15.0,
            ],
        }
    }

    /// Number of sample rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of sample columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Sample at `(row, col)`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.samples.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// All samples of one row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.cols)?;
        self.samples.get(start..start + self.cols)
    }

    /// Number of cells as `(rows, cols)`: one less than the sample grid
    /// in each axis.
    #[must_use]
    pub const fn cell_shape(&self) -> (usize, usize) {
        (self.rows - 1, self.cols - 1)
    }

    /// Corner samples of the cell whose top-left sample is `(row, col)`.
    #[must_use]
    pub fn cell_values(&self, row: usize, col: usize) -> Option<CellValues> {
        Some(CellValues::new([
            self.get(row, col)?,
            self.get(row, col + 1)?,
            self.get(row + 1, col + 1)?,
            self.get(row + 1, col)?,
        ]))
    }

    /// Threshold every sample against `alpha` (`value > alpha`).
    #[must_use]
    pub fn mask(&self, alpha: f64) -> MaskGrid {
        MaskGrid {
            rows: self.rows,
            cols: self.cols,
            cells: self.samples.iter().map(|&v| v > alpha).collect(),
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for ScalarField {
    type Error = FieldError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<ScalarField> for Vec<Vec<f64>> {
    fn from(field: ScalarField) -> Self {
        field
            .samples
            .chunks(field.cols)
            .map(<[f64]>::to_vec)
            .collect()
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.samples.chunks(self.cols) {
            let line: Vec<String> = row.iter().map(|v| format!("{v:>6}")).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Per-sample threshold result for a whole field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl MaskGrid {
    /// Whether the sample at `(row, col)` is above the iso-value.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Corner mask of the cell whose top-left sample is `(row, col)`.
    #[must_use]
    pub fn cell_mask(&self, row: usize, col: usize) -> Option<CornerMask> {
        Some(CornerMask::new([
            self.get(row, col)?,
            self.get(row, col + 1)?,
            self.get(row + 1, col + 1)?,
            self.get(row + 1, col)?,
        ]))
    }

    /// Number of samples above the iso-value.
    #[must_use]
    pub fn count_above(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

impl fmt::Display for MaskGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: Vec<&str> = row.iter().map(|&c| if c { "1" } else { "0" }).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Above-threshold flags of a cell's four corners, clockwise from the
/// top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CornerMask([bool; CORNERS]);

impl CornerMask {
    /// Wrap four corner flags.
    #[must_use]
    pub const fn new(corners: [bool; CORNERS]) -> Self {
        Self(corners)
    }

    /// Threshold four corner values against `alpha`.
    #[must_use]
    pub fn from_values(values: CellValues, alpha: f64) -> Self {
        Self(values.0.map(|v| v > alpha))
    }

    /// Build a mask from the low four bits of `bits`; bit `i` is corner `i`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self([
            bits & 0b0001 != 0,
            bits & 0b0010 != 0,
            bits & 0b0100 != 0,
            bits & 0b1000 != 0,
        ])
    }

    /// The four flags.
    #[must_use]
    pub const fn corners(self) -> [bool; CORNERS] {
        self.0
    }

    /// Flag of `corner`, taken modulo four.
    #[must_use]
    pub const fn is_set(self, corner: usize) -> bool {
        self.0[corner % CORNERS]
    }

    /// Number of corners above the iso-value.
    #[must_use]
    pub fn count(self) -> usize {
        self.0.iter().filter(|&&c| c).count()
    }

    /// Shift every flag one corner clockwise (corner 0 moves to corner 1).
    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        let [a, b, c, d] = self.0;
        Self([d, a, b, c])
    }
}

impl fmt::Display for CornerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &corner in &self.0 {
            f.write_str(if corner { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Raw samples at a cell's four corners, in [`CornerMask`] order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellValues([f64; CORNERS]);

impl CellValues {
    /// Wrap four corner samples.
    #[must_use]
    pub const fn new(values: [f64; CORNERS]) -> Self {
        Self(values)
    }

    /// Sample at `corner`, taken modulo four.
    #[must_use]
    pub const fn get(self, corner: usize) -> f64 {
        self.0[corner % CORNERS]
    }

    /// The four samples.
    #[must_use]
    pub const fn values(self) -> [f64; CORNERS] {
        self.0
    }
}

impl From<[f64; CORNERS]> for CellValues {
    fn from(values: [f64; CORNERS]) -> Self {
        Self(values)
    }
}
