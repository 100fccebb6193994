//! Pixel classification into binary masks.

use crate::image::{PixelGrid, Rgba};
use crate::mask::BinaryMask;
use crate::util::InkMatchResult;

/// Ink is exactly black with non-zero alpha.
///
/// Transparent black and every other colour, including translucent or dark
/// grey, are background.
#[inline]
pub fn is_ink_pixel(px: Rgba) -> bool {
    px.r == 0 && px.g == 0 && px.b == 0 && px.a != 0
}

impl BinaryMask {
    /// Classifies every pixel of `grid` into an ink mask of the same size.
    ///
    /// The mask origin is the grid's top-left pixel regardless of the
    /// grid's declared origin.
    pub fn from_pixels(grid: &PixelGrid) -> InkMatchResult<Self> {
        let bounds = grid.bounds();
        Self::from_fn(bounds.width, bounds.height, |x, y| {
            is_ink_pixel(grid.at(bounds.min_x + x as i64, bounds.min_y + y as i64))
        })
    }
}
