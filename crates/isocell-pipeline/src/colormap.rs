//! Color lookup tables for visualising 8-bit difference images.
//!
//! Follows the same strategy shape as the other pluggable stages: the
//! [`Colormap`] trait maps a gray level to a color, and
//! [`ColormapKind`] selects an implementation at runtime.

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Selects which color lookup table to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColormapKind {
    /// Classic "jet" ramp: dark blue, blue, cyan, yellow, red, dark red.
    #[default]
    Jet,
    /// Identity: the gray level on all three channels.
    Gray,
}

/// A gray-level-to-color mapping.
pub trait Colormap {
    /// Color for one gray level.
    fn color(&self, level: u8) -> Rgb<u8>;

    /// All 256 colors, indexed by gray level.
    fn lookup_table(&self) -> [Rgb<u8>; 256] {
        std::array::from_fn(|i| self.color(u8::try_from(i).unwrap_or(u8::MAX)))
    }

    /// Color every pixel of `image` through the lookup table.
    fn apply(&self, image: &GrayImage) -> RgbImage {
        let table = self.lookup_table();
        RgbImage::from_fn(image.width(), image.height(), |x, y| {
            table[usize::from(image.get_pixel(x, y).0[0])]
        })
    }
}

impl Colormap for ColormapKind {
    fn color(&self, level: u8) -> Rgb<u8> {
        match *self {
            Self::Jet => jet(level),
            Self::Gray => Rgb([level, level, level]),
        }
    }
}

/// Piecewise-linear jet ramp.
///
/// Each channel is a clamped triangle `1.5 − |4x − c|` centred at
/// `c = 3` (red), `2` (green) and `1` (blue) for `x` in `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn jet(level: u8) -> Rgb<u8> {
    let x = f64::from(level) / 255.0;
    let channel = |centre: f64| {
        let v = (1.5 - 4.0f64.mul_add(x, -centre).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}
