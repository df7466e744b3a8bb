//! isocell-export: Pure format serializers (sans-IO)
//!
//! Converts classified cell grids into output formats. Currently
//! supports SVG; raster output is produced by the pipeline itself.

pub mod svg;

pub use svg::{SvgMetadata, SvgStyle, build_segment_data, to_svg};
