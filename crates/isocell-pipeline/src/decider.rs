//! Asymptotic decider for saddle cells.
//!
//! When exactly two diagonal corners of a cell are above the iso-value,
//! two contour topologies are consistent with the corner signs. The
//! bilinear interpolant of the cell picks one of them: its saddle value
//! `B = (v0·v2 − v1·v3) / (v0 + v2 − v1 − v3)` lies either above or below
//! `alpha`. The decider evaluates the sign of
//!
//! ```text
//! c0 = v3 + v1 - v0 - v2
//! c1 = v0 - v3
//! c2 = v2 - v3
//! c3 = v3
//! D  = c1*c2 - c0*c3 + c0*alpha
//! ```
//!
//! which expands to `D = (v0 + v2 − v1 − v3) · (B − alpha)`.
//!
//! `D == 0` is only reachable by exact floating-point coincidence, so a
//! caller may widen it to a band with [`decide_with_tolerance`].

use serde::{Deserialize, Serialize};

use crate::field::CellValues;

/// Sign of the asymptotic-decider determinant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// `D > 0`.
    Positive,
    /// `D < 0`.
    Negative,
    /// `D == 0`, also the unused default for non-saddle cells.
    #[default]
    Zero,
}

impl Resolution {
    /// Short label used in reports: `D>0`, `D<0` or `D=0`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "D>0",
            Self::Negative => "D<0",
            Self::Zero => "D=0",
        }
    }

    /// The resolution of the opposite sign.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
            Self::Zero => Self::Zero,
        }
    }
}

/// The decider determinant `D` for corner values `values` at `alpha`.
#[must_use]
pub fn determinant(values: CellValues, alpha: f64) -> f64 {
    let [v0, v1, v2, v3] = values.values();
    let c0 = v3 + v1 - v0 - v2;
    let c1 = v0 - v3;
    let c2 = v2 - v3;
    let c3 = v3;
    c0.mul_add(alpha, c1.mul_add(c2, -(c0 * c3)))
}

/// Classify the sign of the decider determinant exactly.
#[must_use]
pub fn decide(values: CellValues, alpha: f64) -> Resolution {
    decide_with_tolerance(values, alpha, 0.0)
}

/// Classify the sign of the decider determinant, treating
/// `|D| <= tolerance` as zero.
///
/// A NaN determinant (NaN corner values) is reported as
/// [`Resolution::Zero`].
#[must_use]
pub fn decide_with_tolerance(values: CellValues, alpha: f64, tolerance: f64) -> Resolution {
    let d = determinant(values, alpha);
    if d > tolerance {
        Resolution::Positive
    } else if d < -tolerance {
        Resolution::Negative
    } else {
        Resolution::Zero
    }
}
