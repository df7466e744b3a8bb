//! Linear interpolation of contour crossings along cell edges.
//!
//! The default geometry places every crossing at an edge midpoint. With
//! the corner values available, each crossing can instead be placed
//! where the linear interpolant along that edge equals `alpha`:
//!
//! ```text
//! t = (alpha - v_origin) / (v_far - v_origin)
//! ```
//!
//! measured from the edge's origin corner in the canonical frame (see
//! [`Edge::corners`]). Rotation is applied afterwards, exactly as for the
//! default geometry.

use tracing::warn;

use crate::field::CellValues;
use crate::pattern::{Edge, Geometry, Orientation, Pattern};
use crate::types::Point;

/// Edge parameter of the crossing between two corner values.
///
/// Returns `None` when the two values are equal (flat edge) or the
/// result is not finite. Otherwise the parameter is clamped to `[0, 1]`,
/// so `alpha` outside the two values lands on the nearer corner.
#[must_use]
pub fn edge_parameter(origin: f64, far: f64, alpha: f64) -> Option<f64> {
    let t = (alpha - origin) / (far - origin);
    t.is_finite().then(|| t.clamp(0.0, 1.0))
}

/// Interpolated crossing on `edge` for a cell with `values`.
///
/// A degenerate edge falls back to the midpoint instead of producing a
/// NaN or infinite coordinate.
#[must_use]
pub fn crossing(edge: Edge, orientation: Orientation, values: CellValues, alpha: f64) -> Point {
    let (origin, far) = edge.corners(orientation);
    let (origin_value, far_value) = (values.get(origin), values.get(far));
    edge_parameter(origin_value, far_value, alpha).map_or_else(
        || {
            warn!(
                ?edge,
                origin_value, far_value, alpha, "degenerate edge, using midpoint"
            );
            edge.midpoint()
        },
        |t| edge.point_at(t),
    )
}

impl Pattern {
    /// A copy of this pattern with every crossing linearly interpolated.
    ///
    /// Cells without crossings (zero or four corners above `alpha`) are
    /// returned unchanged apart from the geometry tag. The crossings are
    /// recomputed from the corner values, so interpolating an already
    /// interpolated pattern yields the same endpoints.
    #[must_use]
    pub fn interpolated(&self) -> Self {
        let endpoints = self
            .edges
            .iter()
            .map(|&edge| crossing(edge, self.orientation, self.values, self.alpha))
            .collect();
        Self {
            endpoints,
            geometry: Geometry::Interpolated,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::field::CornerMask;
    use crate::pattern::TopologyClass;

    fn assert_close(a: Point, b: Point) {
        assert!(
            a.distance(b) < 1e-9,
            "expected ({}, {}), got ({}, {})",
            b.x,
            b.y,
            a.x,
            a.y
        );
    }

    #[test]
    fn edge_parameter_is_fraction_of_the_way() {
        assert_eq!(edge_parameter(10.0, 30.0, 15.0), Some(0.25));
        assert_eq!(edge_parameter(30.0, 10.0, 15.0), Some(0.75));
    }

    #[test]
    fn edge_parameter_flat_edge_is_none() {
        assert_eq!(edge_parameter(5.0, 5.0, 5.0), None);
        assert_eq!(edge_parameter(5.0, 5.0, 7.0), None);
    }

    #[test]
    fn edge_parameter_clamps_outside_alpha() {
        assert_eq!(edge_parameter(10.0, 20.0, 25.0), Some(1.0));
        assert_eq!(edge_parameter(10.0, 20.0, 5.0), Some(0.0));
    }

    #[test]
    fn edge_parameter_nan_is_none() {
        assert_eq!(edge_parameter(f64::NAN, 20.0, 5.0), None);
    }

    #[test]
    fn one_corner_interpolates_top_and_left() {
        // Corner 0 above; top edge 30 -> 10, left edge 30 -> 20.
        let values = CellValues::new([30.0, 10.0, 0.0, 20.0]);
        let p = Pattern::from_values(values, 25.0).unwrap().interpolated();
        assert_eq!(p.topology(), TopologyClass::One);
        assert_eq!(p.geometry(), Geometry::Interpolated);
        assert_close(p.endpoints()[0], Point::new(12.5, 0.0));
        assert_close(p.endpoints()[1], Point::new(0.0, 25.0));
    }

    #[test]
    fn rotated_one_corner_uses_canonical_edges() {
        // Corner 2 above: canonical top edge runs from corner 2 to 3,
        // canonical left edge from corner 2 to 1.
        let values = CellValues::new([0.0, 10.0, 40.0, 20.0]);
        let p = Pattern::from_values(values, 30.0).unwrap().interpolated();
        assert_eq!(p.orientation().index(), 2);
        // top: t = (30 - 40) / (20 - 40) = 0.5
        assert_close(p.endpoints()[0], Point::new(25.0, 0.0));
        // left: t = (30 - 40) / (10 - 40) = 1/3
        assert_close(p.endpoints()[1], Point::new(0.0, 50.0 / 3.0));
    }

    #[test]
    fn adjacent_interpolates_left_and_right() {
        let values = CellValues::new([30.0, 40.0, 0.0, 10.0]);
        let p = Pattern::from_values(values, 20.0).unwrap().interpolated();
        assert_eq!(p.topology(), TopologyClass::TwoAdjacent);
        // left: corner 0 (30) -> corner 3 (10), t = 0.5
        assert_close(p.endpoints()[0], Point::new(0.0, 25.0));
        // right: corner 1 (40) -> corner 2 (0), t = 0.5
        assert_close(p.endpoints()[1], Point::new(50.0, 25.0));
    }

    #[test]
    fn adjacent_odd_orientation_stays_left_to_right() {
        // Corners 1 and 2 above: orientation 1, canonical left edge is
        // corner 1 -> corner 0, right edge corner 2 -> corner 3.
        let values = CellValues::new([0.0, 40.0, 30.0, 10.0]);
        let p = Pattern::from_values(values, 20.0).unwrap().interpolated();
        assert_eq!(p.orientation().index(), 1);
        assert_close(p.endpoints()[0], Point::new(0.0, 25.0));
        assert_close(p.endpoints()[1], Point::new(50.0, 25.0));
    }

    #[test]
    fn saddle_interpolates_all_four_edges() {
        let values = CellValues::new([12.0, 14.0, 25.0, 20.0]);
        let p = Pattern::new(CornerMask::new([true, false, true, false]), values, 21.0)
            .unwrap()
            .interpolated();
        assert_eq!(p.endpoints().len(), 4);
        // Negative layout: top, left, bottom, right.
        // top: (21 - 12) / (14 - 12) = 4.5 -> clamped to 1.
        assert_close(p.endpoints()[0], Point::new(50.0, 0.0));
        // left: (21 - 12) / (20 - 12) = 1.125 -> clamped to 1.
        assert_close(p.endpoints()[1], Point::new(0.0, 50.0));
        // bottom: (21 - 20) / (25 - 20) = 0.2
        assert_close(p.endpoints()[2], Point::new(10.0, 50.0));
        // right: (21 - 14) / (25 - 14) = 7/11
        assert_close(p.endpoints()[3], Point::new(50.0, 50.0 * 7.0 / 11.0));
    }

    #[test]
    fn crossings_stay_inside_the_cell_when_alpha_is_bracketed() {
        let values = CellValues::new([3.0, 17.0, 9.5, 11.0]);
        for alpha in [3.5, 9.0, 10.0, 12.0, 16.5] {
            let p = Pattern::from_values(values, alpha).unwrap().interpolated();
            for point in p.endpoints() {
                assert!((0.0..=50.0).contains(&point.x), "alpha {alpha}: {point:?}");
                assert!((0.0..=50.0).contains(&point.y), "alpha {alpha}: {point:?}");
            }
        }
    }

    #[test]
    fn alpha_on_a_corner_value_lands_on_that_corner() {
        // Corner 0 above alpha; corner 1 equals alpha exactly.
        let values = CellValues::new([30.0, 21.0, 10.0, 10.0]);
        let p = Pattern::from_values(values, 21.0).unwrap().interpolated();
        assert_eq!(p.topology(), TopologyClass::One);
        assert_eq!(p.endpoints()[0], Point::new(50.0, 0.0));
        assert!(p.endpoints().iter().all(|q| q.x.is_finite() && q.y.is_finite()));
    }

    #[test]
    fn flat_edge_falls_back_to_midpoint() {
        // Inconsistent mask with equal values on the crossed edges.
        let values = CellValues::new([5.0, 5.0, 5.0, 5.0]);
        let p = Pattern::new(CornerMask::new([true, false, false, false]), values, 5.0)
            .unwrap()
            .interpolated();
        assert_eq!(p.endpoints(), &[Edge::Top.midpoint(), Edge::Left.midpoint()]);
    }

    #[test]
    fn interpolation_is_idempotent() {
        let values = CellValues::new([3.0, 17.0, 9.5, 11.0]);
        let once = Pattern::from_values(values, 10.0).unwrap().interpolated();
        let twice = once.interpolated();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_cells_keep_no_endpoints() {
        let values = CellValues::new([1.0, 2.0, 3.0, 4.0]);
        let p = Pattern::from_values(values, 10.0).unwrap();
        let q = p.interpolated();
        assert_eq!(q.topology(), TopologyClass::Zero);
        assert!(q.endpoints().is_empty());
        assert_eq!(p.geometry(), Geometry::Default);
    }
}
