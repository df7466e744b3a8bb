//! Human-readable and JSON reports of a classifier run.

use std::fmt;

use serde::Serialize;

use crate::field::{MaskGrid, ScalarField};
use crate::grid::PatternGrid;
use crate::types::ClassifierResult;

/// Console report: the field, its mask, then one line per cell.
///
/// ```text
/// cell (2, 0): class=2D decider=D>0 orientation=1
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    field: &'a ScalarField,
    alpha: f64,
    mask: &'a MaskGrid,
    patterns: &'a PatternGrid,
}

impl<'a> Report<'a> {
    /// Report on `result`, which was computed from `field` at `alpha`.
    #[must_use]
    pub const fn new(field: &'a ScalarField, alpha: f64, result: &'a ClassifierResult) -> Self {
        Self {
            field,
            alpha,
            mask: &result.mask,
            patterns: &result.patterns,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field:")?;
        write!(f, "{}", self.field)?;
        writeln!(f)?;
        writeln!(f, "Mask (alpha = {}):", self.alpha)?;
        write!(f, "{}", self.mask)?;
        writeln!(f)?;
        for (row, col, pattern) in self.patterns.iter() {
            writeln!(f, "cell ({row}, {col}): {pattern}")?;
        }
        Ok(())
    }
}

/// Machine-readable report, serialized by the binaries with `serde_json`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    /// Iso-value.
    pub alpha: f64,
    /// Input samples, as rows.
    pub field: &'a ScalarField,
    /// Corner flags.
    pub mask: &'a MaskGrid,
    /// Cells with midpoint geometry.
    pub patterns: &'a PatternGrid,
    /// Cells with interpolated geometry.
    pub interpolated: &'a PatternGrid,
}

impl<'a> JsonReport<'a> {
    /// Collect the serializable parts of `result`.
    #[must_use]
    pub const fn new(field: &'a ScalarField, alpha: f64, result: &'a ClassifierResult) -> Self {
        Self {
            alpha,
            field,
            mask: &result.mask,
            patterns: &result.patterns,
            interpolated: &result.interpolated,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::run_classifier;
    use crate::types::ClassifierConfig;

    fn demo() -> (ScalarField, ClassifierResult) {
        let field = ScalarField::demo();
        let result = run_classifier(&field, &ClassifierConfig::default()).unwrap();
        (field, result)
    }

    #[test]
    fn text_report_lists_every_cell() {
        let (field, result) = demo();
        let text = Report::new(&field, 21.0, &result).to_string();
        assert!(text.starts_with("Field:\n"));
        assert!(text.contains("Mask (alpha = 21):\n0 0 1 0\n0 0 0 0\n0 1 0 0\n1 0 0 0\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("cell (")).count(), 9);
        assert!(text.contains("cell (0, 0): class=0 orientation=0\n"));
        assert!(text.contains("cell (2, 0): class=2D decider=D>0 orientation=1\n"));
    }

    #[test]
    fn json_report_carries_both_geometries() {
        let (field, result) = demo();
        let json = serde_json::to_value(JsonReport::new(&field, 21.0, &result)).unwrap();
        assert_eq!(json["alpha"], 21.0);
        assert_eq!(json["field"][0][2], 25.0);
        assert_eq!(json["patterns"]["patterns"][0]["geometry"], "Default");
        assert_eq!(
            json["interpolated"]["patterns"][0]["geometry"],
            "Interpolated"
        );
        assert_eq!(json["patterns"]["patterns"][6]["topology"], "TwoDiagonal");
        assert_eq!(json["patterns"]["patterns"][6]["resolution"], "Positive");
    }
}
