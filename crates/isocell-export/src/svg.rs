//! SVG export serializer.
//!
//! Converts a [`PatternGrid`] into an SVG string using the [`svg`] crate
//! for document construction, XML escaping, and path data formatting.
//!
//! Each cell becomes a `<g>` translated to its tile. Inside the group the
//! segment endpoints are rotated in coordinate space about the cell
//! centre, the vector counterpart of the raster rotation the pipeline
//! renderer applies. Each segment is a `<path>` with one `M` and one `L`
//! command.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Group, Path, Title};
use svg::node::{Text, Value};

use isocell_pipeline::{CELL_EDGE, ClassifierConfig, PatternGrid, Point};

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the iso-value and geometry so exported files are
    /// distinguishable.
    pub description: Option<&'a str>,
}

/// Stroke and marker settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgStyle {
    /// Stroke width of contour segments.
    pub stroke_width: f64,
    /// Radius of the sample markers at cell corners (`0` disables them).
    pub corner_radius: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            corner_radius: f64::from(ClassifierConfig::DEFAULT_CORNER_RADIUS),
        }
    }
}

impl From<&ClassifierConfig> for SvgStyle {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            corner_radius: f64::from(config.corner_radius),
            ..Self::default()
        }
    }
}

/// Build an SVG path `d` attribute for one segment.
///
/// # Examples
///
/// ```
/// use isocell_pipeline::Point;
/// use isocell_export::build_segment_data;
///
/// let d = build_segment_data(Point::new(25.0, 0.0), Point::new(0.0, 25.0));
/// assert_eq!(d, "M25,0 L0,25");
/// ```
#[must_use]
pub fn build_segment_data(start: Point, end: Point) -> String {
    let data = Data::new()
        .move_to((start.x, start.y))
        .line_to((end.x, end.y));
    String::from(Value::from(data))
}

#[allow(clippy::cast_precision_loss)]
fn tile_offset(index: usize) -> f64 {
    index as f64 * CELL_EDGE
}

/// Serialize a grid of classified cells into an SVG document string.
///
/// The `viewBox` matches the raster mosaic, one 50-unit square per cell.
/// Cells without crossings still get an (empty) group so the group index
/// always equals the cell index.
#[must_use]
pub fn to_svg(grid: &PatternGrid, metadata: &SvgMetadata<'_>, style: &SvgStyle) -> String {
    let dimensions = grid.pixel_dimensions();
    let (w, h) = (dimensions.width, dimensions.height);
    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    // Optional <title> element
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    // Optional <desc> element
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    let mut cells = Group::new()
        .set("id", "cells")
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", style.stroke_width);

    for (row, col, pattern) in grid.iter() {
        let mut group = Group::new()
            .set("id", format!("cell-{row}-{col}"))
            .set("data-class", pattern.topology().label())
            .set("data-orientation", pattern.orientation().to_string())
            .set(
                "transform",
                format!("translate({},{})", tile_offset(col), tile_offset(row)),
            );
        for (start, end) in pattern.oriented_segments() {
            group = group.add(Path::new().set("d", build_segment_data(start, end)));
        }
        cells = cells.add(group);
    }
    doc = doc.add(cells);

    if style.corner_radius > 0.0 {
        let mut corners = Group::new().set("id", "corners").set("fill", "black");
        for row in 0..=grid.rows() {
            for col in 0..=grid.cols() {
                corners = corners.add(
                    Circle::new()
                        .set("cx", tile_offset(col))
                        .set("cy", tile_offset(row))
                        .set("r", style.corner_radius),
                );
            }
        }
        doc = doc.add(corners);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use isocell_pipeline::{ScalarField, TopologyClass};

    use super::*;

    fn demo_grid() -> PatternGrid {
        PatternGrid::classify(&ScalarField::demo(), 21.0, 0.0).unwrap()
    }

    fn no_meta() -> SvgMetadata<'static> {
        SvgMetadata::default()
    }

    fn no_markers() -> SvgStyle {
        SvgStyle {
            corner_radius: 0.0,
            ..SvgStyle::default()
        }
    }

    #[test]
    fn segment_data_formats_move_and_line() {
        let d = build_segment_data(Point::new(12.5, 50.0), Point::new(0.0, 25.0));
        assert_eq!(d, "M12.5,50 L0,25");
    }

    #[test]
    fn document_has_mosaic_view_box() {
        let svg = to_svg(&demo_grid(), &no_meta(), &SvgStyle::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 150 150""#), "{svg}");
        assert!(svg.contains(r#"width="150""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn one_group_per_cell() {
        let svg = to_svg(&demo_grid(), &no_meta(), &no_markers());
        assert_eq!(svg.matches("id=\"cell-").count(), 9);
        assert!(svg.contains("id=\"cell-2-2\""));
    }

    #[test]
    fn path_count_matches_segment_count() {
        let grid = demo_grid();
        let expected: usize = grid.iter().map(|(_, _, p)| p.segments().count()).sum();
        let svg = to_svg(&grid, &no_meta(), &no_markers());
        assert_eq!(svg.matches("<path").count(), expected);
        // Five single-corner cells and one saddle.
        assert_eq!(expected, 7);
    }

    #[test]
    fn segments_are_rotated_into_place() {
        // Cell (0, 1) has corner 1 above: the top-left cut turned once
        // becomes the top-right cut.
        let grid = demo_grid();
        let pattern = grid.get(0, 1).unwrap();
        assert_eq!(pattern.topology(), TopologyClass::One);
        let svg = to_svg(&grid, &no_meta(), &no_markers());
        assert!(svg.contains(r#"d="M50,25 L25,0""#), "{svg}");
        assert!(svg.contains(r#"transform="translate(50,0)""#));
    }

    #[test]
    fn corner_markers_cover_every_sample() {
        let svg = to_svg(&demo_grid(), &no_meta(), &SvgStyle::default());
        assert_eq!(svg.matches("<circle").count(), 16);
        let svg = to_svg(&demo_grid(), &no_meta(), &no_markers());
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn metadata_is_escaped() {
        let meta = SvgMetadata {
            title: Some("alpha < 21 & more"),
            description: Some("interpolated"),
        };
        let svg = to_svg(&demo_grid(), &meta, &SvgStyle::default());
        assert!(svg.contains("<title>alpha &lt; 21 &amp; more</title>"), "{svg}");
        assert!(svg.contains("<desc>interpolated</desc>"));
    }

    #[test]
    fn style_from_config_uses_corner_radius() {
        let config = ClassifierConfig {
            corner_radius: 0,
            ..ClassifierConfig::default()
        };
        assert_eq!(SvgStyle::from(&config).corner_radius, 0.0);
    }
}
