//! Corner-pattern classification (marching squares).
//!
//! A cell's [`CornerMask`] is reduced to one of six topology classes
//! plus an [`Orientation`]. Every class has one canonical layout drawn in
//! an unrotated 50×50 frame; the orientation says how many clockwise
//! quarter turns bring that layout onto the actual cell.
//!
//! In the canonical frame the reference corner (the one named by the
//! orientation) sits at the top-left. The four cell edges are therefore
//! bounded by these corners, relative to the reference corner `p`:
//!
//! | edge   | from      | to        |
//! |--------|-----------|-----------|
//! | top    | `p`       | `p + 1`   |
//! | right  | `p + 1`   | `p + 2`   |
//! | bottom | `p + 3`   | `p + 2`   |
//! | left   | `p`       | `p + 3`   |
//!
//! Contour crossings are listed as edges, so the default geometry (edge
//! midpoints) and the interpolated geometry share one rule table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decider::{Resolution, decide_with_tolerance};
use crate::field::{CORNERS, CellValues, CornerMask};
use crate::types::{CELL_EDGE, PatternError, Point};

/// Topology of a cell, named after the number of corners above `alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopologyClass {
    /// No corner above the iso-value.
    Zero,
    /// One corner above.
    One,
    /// Two neighbouring corners above.
    TwoAdjacent,
    /// Two opposite corners above (saddle).
    TwoDiagonal,
    /// Three corners above.
    Three,
    /// All corners above.
    Four,
}

impl TopologyClass {
    /// Short label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::TwoAdjacent => "2S",
            Self::TwoDiagonal => "2D",
            Self::Three => "3",
            Self::Four => "4",
        }
    }

    /// Whether the contour crosses this cell at all.
    #[must_use]
    pub const fn has_crossings(self) -> bool {
        !matches!(self, Self::Zero | Self::Four)
    }
}

/// Number of clockwise quarter turns from the canonical layout, and the
/// index of the reference corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Orientation(u8);

impl Orientation {
    /// Orientation whose reference corner is `corner` (taken modulo four).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(corner: usize) -> Self {
        Self((corner % CORNERS) as u8)
    }

    /// Reference corner index (0–3).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Clockwise quarter turns applied when rendering.
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    /// The corner clockwise after the reference corner.
    #[must_use]
    pub const fn next_corner(self) -> usize {
        (self.index() + 1) % CORNERS
    }

    /// The corner diagonally opposite the reference corner.
    #[must_use]
    pub const fn opposite_corner(self) -> usize {
        (self.index() + 2) % CORNERS
    }

    /// The corner clockwise before the reference corner.
    #[must_use]
    pub const fn previous_corner(self) -> usize {
        (self.index() + 3) % CORNERS
    }

    /// One further quarter turn clockwise.
    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        Self::new(self.index() + 1)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A side of the canonical cell frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// `y = 0`.
    Top,
    /// `x = 50`.
    Right,
    /// `y = 50`.
    Bottom,
    /// `x = 0`.
    Left,
}

impl Edge {
    /// Corners bounding this edge as `(origin, far)`, where `origin` sits
    /// at parameter `t = 0` along the edge.
    #[must_use]
    pub const fn corners(self, orientation: Orientation) -> (usize, usize) {
        match self {
            Self::Top => (orientation.index(), orientation.next_corner()),
            Self::Right => (orientation.next_corner(), orientation.opposite_corner()),
            Self::Bottom => (orientation.previous_corner(), orientation.opposite_corner()),
            Self::Left => (orientation.index(), orientation.previous_corner()),
        }
    }

    /// Point at parameter `t` (0 to 1) along this edge of the canonical frame.
    #[must_use]
    pub fn point_at(self, t: f64) -> Point {
        let along = CELL_EDGE * t;
        match self {
            Self::Top => Point::new(along, 0.0),
            Self::Right => Point::new(CELL_EDGE, along),
            Self::Bottom => Point::new(along, CELL_EDGE),
            Self::Left => Point::new(0.0, along),
        }
    }

    /// Midpoint of this edge, the default (non-interpolated) crossing.
    #[must_use]
    pub fn midpoint(self) -> Point {
        self.point_at(0.5)
    }
}

/// Crossings of a single isolated corner: top-mid to left-mid.
const CORNER_CUT: [Edge; 2] = [Edge::Top, Edge::Left];
/// Crossings of two neighbouring corners: left-mid to right-mid.
const HALF_SPLIT: [Edge; 2] = [Edge::Left, Edge::Right];
/// Saddle whose centre joins the above-alpha corners: (top, right), (bottom, left).
const SADDLE_JOINED: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
/// Saddle whose centre separates the above-alpha corners: (top, left), (bottom, right).
const SADDLE_SEPARATED: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];
/// Fallback when the decider is undecided: (left, right), (top, bottom).
const SADDLE_CROSSED: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

/// Choose the saddle layout for a decider outcome.
///
/// `D` carries the sign of `v0 + v2 − v1 − v3`, which is positive when
/// corners 0 and 2 are the above-alpha pair (even orientation) and
/// negative when corners 1 and 3 are. The layout is picked from the
/// saddle's side of `alpha`, so the sign is read relative to that parity.
const fn saddle_edges(resolution: Resolution, orientation: Orientation) -> &'static [Edge] {
    let even = orientation.index() % 2 == 0;
    match (resolution, even) {
        (Resolution::Zero, _) => &SADDLE_CROSSED,
        (Resolution::Positive, true) | (Resolution::Negative, false) => &SADDLE_JOINED,
        (Resolution::Negative, true) | (Resolution::Positive, false) => &SADDLE_SEPARATED,
    }
}

/// Result of classifying one corner mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Topology class.
    pub topology: TopologyClass,
    /// Decider outcome; [`Resolution::Zero`] unless the cell is a saddle.
    pub resolution: Resolution,
    /// Quarter turns from the canonical layout.
    pub orientation: Orientation,
    /// Crossed edges in canonical order; consecutive pairs are segments.
    pub edges: &'static [Edge],
}

impl Classification {
    const fn plain(topology: TopologyClass, orientation: Orientation, edges: &'static [Edge]) -> Self {
        Self {
            topology,
            resolution: Resolution::Zero,
            orientation,
            edges,
        }
    }

    /// Default segment endpoints: the midpoints of the crossed edges.
    #[must_use]
    pub fn default_endpoints(&self) -> Vec<Point> {
        self.edges.iter().map(|edge| edge.midpoint()).collect()
    }
}

/// Classify a cell from its corner mask.
///
/// `values` and `alpha` feed the asymptotic decider, which only runs for
/// diagonal two-corner masks. `tolerance` widens the decider's zero band
/// (see [`decide_with_tolerance`]).
///
/// # Errors
///
/// Returns [`PatternError::Unclassified`] if a two-corner mask matches
/// neither the adjacent nor the diagonal rule.
pub fn classify(
    mask: CornerMask,
    values: CellValues,
    alpha: f64,
    tolerance: f64,
) -> Result<Classification, PatternError> {
    let corners = mask.corners();
    match mask.count() {
        0 => Ok(Classification::plain(
            TopologyClass::Zero,
            Orientation::default(),
            &[],
        )),
        1 => corners
            .iter()
            .position(|&above| above)
            .map(|corner| {
                Classification::plain(TopologyClass::One, Orientation::new(corner), &CORNER_CUT)
            })
            .ok_or(PatternError::Unclassified { mask }),
        2 => classify_two(mask, values, alpha, tolerance),
        3 => corners
            .iter()
            .position(|&above| !above)
            .map(|corner| {
                Classification::plain(TopologyClass::Three, Orientation::new(corner), &CORNER_CUT)
            })
            .ok_or(PatternError::Unclassified { mask }),
        _ => Ok(Classification::plain(
            TopologyClass::Four,
            Orientation::default(),
            &[],
        )),
    }
}

/// Scan the corners clockwise for the first adjacent or diagonal pair.
fn classify_two(
    mask: CornerMask,
    values: CellValues,
    alpha: f64,
    tolerance: f64,
) -> Result<Classification, PatternError> {
    for corner in 0..CORNERS {
        let orientation = Orientation::new(corner);
        let here = mask.is_set(corner);
        let next = mask.is_set(orientation.next_corner());
        let previous = mask.is_set(orientation.previous_corner());

        if here && next {
            return Ok(Classification::plain(
                TopologyClass::TwoAdjacent,
                orientation,
                &HALF_SPLIT,
            ));
        }
        if here && !next && !previous {
            let resolution = decide_with_tolerance(values, alpha, tolerance);
            return Ok(Classification {
                topology: TopologyClass::TwoDiagonal,
                resolution,
                orientation,
                edges: saddle_edges(resolution, orientation),
            });
        }
    }
    Err(PatternError::Unclassified { mask })
}

/// Whether a pattern holds edge midpoints or interpolated crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Geometry {
    /// Endpoints are edge midpoints.
    #[default]
    Default,
    /// Endpoints were placed by linear interpolation.
    Interpolated,
}

/// A classified grid cell.
///
/// Constructed once from a mask, its corner values and `alpha`. The
/// interpolated variant is produced by
/// [`Pattern::interpolated`](crate::interpolate), which returns a new
/// value rather than rewriting this one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub(crate) topology: TopologyClass,
    pub(crate) resolution: Resolution,
    pub(crate) orientation: Orientation,
    pub(crate) mask: CornerMask,
    pub(crate) values: CellValues,
    pub(crate) alpha: f64,
    #[serde(skip)]
    pub(crate) edges: &'static [Edge],
    pub(crate) endpoints: Vec<Point>,
    pub(crate) geometry: Geometry,
}

impl Pattern {
    /// Classify a cell with an exact decider comparison.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Unclassified`] if the mask cannot be classified.
    pub fn new(mask: CornerMask, values: CellValues, alpha: f64) -> Result<Self, PatternError> {
        Self::with_tolerance(mask, values, alpha, 0.0)
    }

    /// Classify a cell, deriving the mask from `values > alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Unclassified`] if the mask cannot be classified.
    pub fn from_values(values: CellValues, alpha: f64) -> Result<Self, PatternError> {
        Self::new(CornerMask::from_values(values, alpha), values, alpha)
    }

    /// Classify a cell with a decider tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Unclassified`] if the mask cannot be classified.
    pub fn with_tolerance(
        mask: CornerMask,
        values: CellValues,
        alpha: f64,
        tolerance: f64,
    ) -> Result<Self, PatternError> {
        let classification = classify(mask, values, alpha, tolerance)?;
        Ok(Self {
            topology: classification.topology,
            resolution: classification.resolution,
            orientation: classification.orientation,
            mask,
            values,
            alpha,
            edges: classification.edges,
            endpoints: classification.default_endpoints(),
            geometry: Geometry::Default,
        })
    }

    /// Topology class.
    #[must_use]
    pub const fn topology(&self) -> TopologyClass {
        self.topology
    }

    /// Decider outcome (meaningful for [`TopologyClass::TwoDiagonal`] only).
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Quarter turns from the canonical layout.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Corner mask the pattern was built from.
    #[must_use]
    pub const fn mask(&self) -> CornerMask {
        self.mask
    }

    /// Corner values the pattern was built from.
    #[must_use]
    pub const fn values(&self) -> CellValues {
        self.values
    }

    /// Iso-value the pattern was built for.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Crossed edges, in endpoint order.
    #[must_use]
    pub const fn edges(&self) -> &'static [Edge] {
        self.edges
    }

    /// Segment endpoints in the canonical (unrotated) frame.
    #[must_use]
    pub fn endpoints(&self) -> &[Point] {
        &self.endpoints
    }

    /// Whether the endpoints are midpoints or interpolated.
    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Segments as consecutive endpoint pairs in the canonical frame.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.endpoints.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Segments rotated onto the actual cell (coordinate-space rotation
    /// about the cell centre).
    pub fn oriented_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let turns = self.orientation.quarter_turns();
        self.segments().map(move |(a, b)| {
            (
                a.rotated_cw(turns, CELL_EDGE),
                b.rotated_cw(turns, CELL_EDGE),
            )
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class={}", self.topology.label())?;
        if self.topology == TopologyClass::TwoDiagonal {
            write!(f, " decider={}", self.resolution.label())?;
        }
        write!(f, " orientation={}", self.orientation)
    }
}
