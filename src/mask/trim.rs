//! Cropping a mask to the bounding box of its ink.

use crate::mask::{Cell, Mask};

/// Inclusive bounding box of the ink cells in a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkBounds {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl InkBounds {
    /// Width of the box in cells.
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Height of the box in cells.
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

impl<T: Cell> Mask<T> {
    fn column_has_ink(&self, x: usize) -> bool {
        (0..self.height).any(|y| self.cell(x, y).is_ink())
    }

    fn row_has_ink(&self, y: usize) -> bool {
        (0..self.width).any(|x| self.cell(x, y).is_ink())
    }

    /// Returns the tight bounds of all ink cells, or `None` for a blank mask.
    pub fn ink_bounds(&self) -> Option<InkBounds> {
        let min_x = (0..self.width).find(|&x| self.column_has_ink(x))?;
        let max_x = (0..self.width).rev().find(|&x| self.column_has_ink(x))?;
        let min_y = (0..self.height).find(|&y| self.row_has_ink(y))?;
        let max_y = (0..self.height).rev().find(|&y| self.row_has_ink(y))?;
        Some(InkBounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Crops the mask to its ink bounds, re-based to `(0, 0)`.
    ///
    /// A blank mask has no ink bounds and is returned unchanged at full size.
    pub fn trim(&self) -> Mask<T> {
        let Some(bounds) = self.ink_bounds() else {
            return self.clone();
        };
        let width = bounds.width();
        let height = bounds.height();
        let mut data = Vec::with_capacity(width * height);
        for y in bounds.min_y..=bounds.max_y {
            let start = y * self.width + bounds.min_x;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Mask {
            data,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InkBounds;
    use crate::mask::{BinaryMask, Mask};

    fn parse(rows: &[&str]) -> BinaryMask {
        let width = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '#'))
            .collect();
        Mask::new(data, width, rows.len()).unwrap()
    }

    #[test]
    fn trims_to_ink_box() {
        let mask = parse(&[".....", "..#..", ".#.#.", "....."]);
        assert_eq!(
            mask.ink_bounds(),
            Some(InkBounds {
                min_x: 1,
                min_y: 1,
                max_x: 3,
                max_y: 2
            })
        );
        let trimmed = mask.trim();
        assert_eq!(trimmed, parse(&[".#.", "#.#"]));
    }

    #[test]
    fn blank_mask_is_kept_whole() {
        let mask = BinaryMask::filled(4, 3, false).unwrap();
        assert_eq!(mask.ink_bounds(), None);
        assert_eq!(mask.trim(), mask);
    }

    #[test]
    fn intensity_masks_trim_on_positive_cells() {
        let mask = Mask::new(vec![0.0f32, 0.0, 0.25, 0.0], 2, 2).unwrap();
        let trimmed = mask.trim();
        assert_eq!(trimmed.dimensions(), (1, 1));
        assert_eq!(trimmed.as_slice(), &[0.25]);
    }
}
