//! Per-cell absolute difference without prefix sums.

use crate::mask::{Cell, Mask};
use crate::util::math::mean;
use crate::util::{InkMatchError, InkMatchResult};

/// Mean absolute difference of corresponding cell intensities.
pub fn direct_distance<T: Cell>(a: &Mask<T>, b: &Mask<T>) -> InkMatchResult<f64> {
    a.same_size(b)?;
    let sum: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&va, &vb)| (va.intensity() - vb.intensity()).abs())
        .sum();
    mean(sum, a.as_slice().len()).ok_or(InkMatchError::InvalidDimensions {
        width: a.width(),
        height: a.height(),
    })
}
