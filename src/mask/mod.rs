//! Ink masks and their geometric transforms.
//!
//! A `Mask<T>` is an owned, row-major, rectangular grid of cells. Binary masks
//! (`Mask<bool>`) come out of the pixel classifier; intensity masks
//! (`Mask<f32>`) hold ink amounts in `[0, 1]`. Both are read through the
//! `Cell` trait so the distance metrics can treat them uniformly. Masks are
//! never mutated after construction: `trim` and `scale` allocate new masks.

use crate::util::{InkMatchError, InkMatchResult};

mod build;
mod scale;
mod trim;

pub use build::is_ink_pixel;
pub use trim::InkBounds;

/// Value stored in a mask cell.
pub trait Cell: Copy + Default + PartialEq + Send + Sync + 'static {
    /// Returns true when the cell holds any ink.
    fn is_ink(self) -> bool;
    /// Returns the ink amount as a real number (`0.0` for background).
    fn intensity(self) -> f64;
}

impl Cell for bool {
    #[inline]
    fn is_ink(self) -> bool {
        self
    }

    #[inline]
    fn intensity(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

impl Cell for f32 {
    #[inline]
    fn is_ink(self) -> bool {
        self > 0.0
    }

    #[inline]
    fn intensity(self) -> f64 {
        f64::from(self)
    }
}

/// Owned rectangular grid of ink cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

/// Mask of ink presence.
pub type BinaryMask = Mask<bool>;

/// Mask of ink intensity in `[0, 1]`.
pub type IntensityMask = Mask<f32>;

impl<T: Cell> Mask<T> {
    /// Creates a mask from a row-major buffer of exactly `width * height` cells.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> InkMatchResult<Self> {
        let needed = cell_count(width, height)?;
        if data.len() < needed {
            return Err(InkMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(InkMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a mask with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> InkMatchResult<Self> {
        let needed = cell_count(width, height)?;
        Ok(Self {
            data: vec![value; needed],
            width,
            height,
        })
    }

    /// Creates a mask by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> InkMatchResult<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        let needed = cell_count(width, height)?;
        let mut data = Vec::with_capacity(needed);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the mask width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the mask height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the cell at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns row `y` as a slice of `width` cells.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Returns the row-major cell buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Counts cells holding ink.
    pub fn ink_count(&self) -> usize {
        self.data.iter().filter(|cell| cell.is_ink()).count()
    }

    /// Returns true when no cell holds ink.
    pub fn is_blank(&self) -> bool {
        !self.data.iter().any(|cell| cell.is_ink())
    }

    /// Returns the total ink amount over all cells.
    pub fn total_intensity(&self) -> f64 {
        self.data.iter().map(|cell| cell.intensity()).sum()
    }

    /// Iterates over the `(x, y)` coordinates of ink cells in row-major order.
    pub fn ink_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_ink())
            .map(move |(idx, _)| (idx % width, idx / width))
    }

    #[inline]
    pub(crate) fn cell(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    pub(crate) fn same_size<U: Cell>(&self, other: &Mask<U>) -> InkMatchResult<()> {
        if self.dimensions() != other.dimensions() {
            return Err(InkMatchError::SizeMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        Ok(())
    }
}

impl Mask<bool> {
    /// Converts ink presence to intensity (`1.0` ink, `0.0` background).
    pub fn to_intensity(&self) -> IntensityMask {
        Mask {
            data: self
                .data
                .iter()
                .map(|&ink| if ink { 1.0 } else { 0.0 })
                .collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl Mask<f32> {
    /// Creates an intensity mask, rejecting values outside `[0, 1]`.
    pub fn from_intensities(data: Vec<f32>, width: usize, height: usize) -> InkMatchResult<Self> {
        if let Some(bad) = data
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(InkMatchError::invalid_parameter(
                "intensity",
                format!("{bad} is outside [0, 1]"),
            ));
        }
        Self::new(data, width, height)
    }
}

fn cell_count(width: usize, height: usize) -> InkMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(InkMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(InkMatchError::InvalidDimensions { width, height })
}
