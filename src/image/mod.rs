//! Decoded pixel grids.
//!
//! A `PixelGrid` is the hand-off point between image decoding and mask
//! building. Channels are stored at 16 bits so that the ink rule does not
//! depend on the bit depth of the source file. Bounds carry an explicit origin
//! because decoded images may declare one; mask building re-bases to `(0, 0)`.

use crate::util::{InkMatchError, InkMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// A single pixel with 16-bit red, green, blue and alpha channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, u16::MAX);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX);
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Creates a pixel from 16-bit channels.
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Widens 8-bit channels to 16 bits (`v * 257`).
    pub const fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(
            px[0] as u16 * 257,
            px[1] as u16 * 257,
            px[2] as u16 * 257,
            px[3] as u16 * 257,
        )
    }
}

/// Rectangle covered by a pixel grid, in the image's own coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub width: usize,
    pub height: usize,
}

impl Bounds {
    /// Returns true when the absolute coordinate lies inside the bounds.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.local(x, y).is_some()
    }

    fn local(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let lx = usize::try_from(x.checked_sub(self.min_x)?).ok()?;
        let ly = usize::try_from(y.checked_sub(self.min_y)?).ok()?;
        if lx >= self.width || ly >= self.height {
            return None;
        }
        Some((lx, ly))
    }
}

/// Owned row-major RGBA pixel buffer with explicit bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    pixels: Vec<Rgba>,
    bounds: Bounds,
}

impl PixelGrid {
    /// Creates a grid with its origin at `(0, 0)`.
    pub fn new(pixels: Vec<Rgba>, width: usize, height: usize) -> InkMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(InkMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(InkMatchError::InvalidDimensions { width, height })?;
        if pixels.len() < needed {
            return Err(InkMatchError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }
        if pixels.len() > needed {
            return Err(InkMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels,
            bounds: Bounds {
                min_x: 0,
                min_y: 0,
                width,
                height,
            },
        })
    }

    /// Creates a grid by evaluating `f(x, y)` for every local coordinate.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> InkMatchResult<Self>
    where
        F: FnMut(usize, usize) -> Rgba,
    {
        if width == 0 || height == 0 {
            return Err(InkMatchError::InvalidDimensions { width, height });
        }
        let mut pixels = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(pixels, width, height)
    }

    /// Moves the grid so that its top-left pixel sits at `(min_x, min_y)`.
    pub fn with_origin(mut self, min_x: i64, min_y: i64) -> Self {
        self.bounds.min_x = min_x;
        self.bounds.min_y = min_y;
        self
    }

    /// Returns the grid bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns the grid width in pixels.
    pub fn width(&self) -> usize {
        self.bounds.width
    }

    /// Returns the grid height in pixels.
    pub fn height(&self) -> usize {
        self.bounds.height
    }

    /// Returns the pixel at an absolute coordinate.
    ///
    /// Coordinates outside the bounds read as `Rgba::TRANSPARENT`.
    pub fn at(&self, x: i64, y: i64) -> Rgba {
        match self.bounds.local(x, y) {
            Some((lx, ly)) => self.pixels[ly * self.bounds.width + lx],
            None => Rgba::TRANSPARENT,
        }
    }

    /// Returns the pixel at a coordinate relative to the top-left corner.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.bounds.width || y >= self.bounds.height {
            return None;
        }
        self.pixels.get(y * self.bounds.width + x).copied()
    }

    /// Returns the row-major pixel buffer.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}
