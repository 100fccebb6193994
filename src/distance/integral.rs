//! Summed-area tables and the cumulative-difference metrics built on them.

use crate::mask::{Cell, Mask};
use crate::util::math::mean;
use crate::util::{InkMatchError, InkMatchResult};

/// Two-dimensional prefix sums of a mask's ink intensity.
///
/// `S(x, y)` is the ink total of the rectangle `[0, x] x [0, y]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SummedAreaTable {
    width: usize,
    height: usize,
    sums: Vec<f64>,
}

impl SummedAreaTable {
    /// Builds the table in a single row-major pass.
    pub fn from_mask<T: Cell>(mask: &Mask<T>) -> Self {
        let width = mask.width();
        let height = mask.height();
        let mut sums = vec![0.0f64; width * height];
        for y in 0..height {
            let mut row_sum = 0.0f64;
            for x in 0..width {
                row_sum += mask.cell(x, y).intensity();
                let above = if y > 0 { sums[(y - 1) * width + x] } else { 0.0 };
                sums[y * width + x] = row_sum + above;
            }
        }
        Self {
            width,
            height,
            sums,
        }
    }

    /// Returns the table width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the table height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `S(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.sums[y * self.width + x])
    }

    /// Returns the ink total of the whole mask.
    pub fn total(&self) -> f64 {
        self.sums[self.sums.len() - 1]
    }

    /// Returns the ink total of the inclusive rectangle `[x0, x1] x [y0, y1]`.
    pub fn region_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> Option<f64> {
        if x0 > x1 || y0 > y1 || x1 >= self.width || y1 >= self.height {
            return None;
        }
        let at = |x: usize, y: usize| self.sums[y * self.width + x];
        let mut sum = at(x1, y1);
        if x0 > 0 {
            sum -= at(x0 - 1, y1);
        }
        if y0 > 0 {
            sum -= at(x1, y0 - 1);
        }
        if x0 > 0 && y0 > 0 {
            sum += at(x0 - 1, y0 - 1);
        }
        Some(sum)
    }

    /// Returns the row-major table values.
    pub fn as_slice(&self) -> &[f64] {
        &self.sums
    }
}

/// Mean absolute difference of the two tables, each divided by its total.
///
/// Compares how ink accumulates across the masks independent of how much ink
/// each one holds. Fails with `DegenerateMask` when either mask has no ink.
pub fn integral_normalized_distance<T: Cell>(a: &Mask<T>, b: &Mask<T>) -> InkMatchResult<f64> {
    a.same_size(b)?;
    let sat_a = SummedAreaTable::from_mask(a);
    let sat_b = SummedAreaTable::from_mask(b);
    let total_a = sat_a.total();
    let total_b = sat_b.total();
    if total_a <= 0.0 || total_b <= 0.0 {
        return Err(InkMatchError::DegenerateMask {
            reason: "zero total ink in normalized integral comparison",
        });
    }
    let sum: f64 = sat_a
        .as_slice()
        .iter()
        .zip(sat_b.as_slice())
        .map(|(&sa, &sb)| (sa / total_a - sb / total_b).abs())
        .sum();
    mean(sum, sat_a.as_slice().len()).ok_or(InkMatchError::InvalidDimensions {
        width: a.width(),
        height: a.height(),
    })
}

/// Mean absolute difference of the raw prefix sums.
///
/// Defined for every pair of equally sized masks, including blank ones.
pub fn integral_raw_distance<T: Cell>(a: &Mask<T>, b: &Mask<T>) -> InkMatchResult<f64> {
    a.same_size(b)?;
    let sat_a = SummedAreaTable::from_mask(a);
    let sat_b = SummedAreaTable::from_mask(b);
    let sum: f64 = sat_a
        .as_slice()
        .iter()
        .zip(sat_b.as_slice())
        .map(|(&sa, &sb)| (sa - sb).abs())
        .sum();
    mean(sum, sat_a.as_slice().len()).ok_or(InkMatchError::InvalidDimensions {
        width: a.width(),
        height: a.height(),
    })
}
