//! Nearest-cell resampling.

use crate::mask::{Cell, Mask};
use crate::util::{InkMatchError, InkMatchResult};

/// Source index sampled for destination index `dst` (`floor(dst / dst_len * src_len)`).
#[inline]
fn source_index(dst: usize, dst_len: usize, src_len: usize) -> usize {
    dst * src_len / dst_len
}

impl<T: Cell> Mask<T> {
    /// Resamples the mask to exactly `width x height` cells.
    ///
    /// Each destination cell copies the source cell at
    /// `floor(x / width * src_width), floor(y / height * src_height)`; there is
    /// no interpolation.
    pub fn scale(&self, width: usize, height: usize) -> InkMatchResult<Mask<T>> {
        if width == 0 || height == 0 {
            return Err(InkMatchError::InvalidDimensions { width, height });
        }
        if (width, height) == self.dimensions() {
            return Ok(self.clone());
        }
        let cols: Vec<usize> = (0..width)
            .map(|x| source_index(x, width, self.width))
            .collect();
        Mask::from_fn(width, height, |x, y| {
            self.cell(cols[x], source_index(y, height, self.height))
        })
    }
}
