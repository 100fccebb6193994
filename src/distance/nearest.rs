//! Nearest-ink-point distance.
//!
//! For every ink cell of the test mask the closest ink cell of the reference
//! mask is searched inside a tolerance window; the score is the mean of those
//! per-point distances. The mask with fewer ink cells is the reference, so
//! the test side only runs dry when both masks are blank.

use crate::mask::{Cell, Mask};
use crate::util::math::{diagonal, mean, window_radius};
use crate::util::{InkMatchError, InkMatchResult};
use std::cmp::Ordering;

/// Score assigned to a test point with no reference ink inside its window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum UnmatchedPolicy {
    /// The diagonal of the reference mask, `sqrt(W² + H²)`.
    #[default]
    Diagonal,
    /// A fixed distance.
    Fixed(f64),
    /// Leave the point out of the mean.
    Ignore,
}

/// Parameters for [`nearest_ink_distance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestInkParams {
    /// Search window half-size as a fraction of the reference dimensions.
    pub tolerance: f64,
    /// Treatment of test points with no reference ink in range.
    pub unmatched: UnmatchedPolicy,
}

impl Default for NearestInkParams {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            unmatched: UnmatchedPolicy::Diagonal,
        }
    }
}

impl NearestInkParams {
    /// Creates parameters with the given tolerance and the diagonal sentinel.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Checks that the tolerance and sentinel are usable.
    pub fn validate(&self) -> InkMatchResult<()> {
        if !self.tolerance.is_finite() || !(0.0..=1.0).contains(&self.tolerance) {
            return Err(InkMatchError::invalid_parameter(
                "tolerance",
                format!("{} is outside [0, 1]", self.tolerance),
            ));
        }
        if let UnmatchedPolicy::Fixed(d) = self.unmatched {
            if !d.is_finite() || d < 0.0 {
                return Err(InkMatchError::invalid_parameter(
                    "unmatched_distance",
                    format!("{d} is not a finite non-negative distance"),
                ));
            }
        }
        Ok(())
    }
}

/// Compares two equally sized masks cell by cell in row-major order.
fn cell_order<T: Cell>(a: &Mask<T>, b: &Mask<T>) -> Ordering {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(va, vb)| va.intensity().total_cmp(&vb.intensity()))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Mean nearest-ink distance between two equally sized masks.
///
/// The reference is the mask with fewer ink cells; equal counts are broken by
/// comparing cells in row-major order, so the score does not depend on
/// argument order.
///
/// Fails with `EmptyMask` when the test mask has no ink, and with
/// `DegenerateMask` when `UnmatchedPolicy::Ignore` leaves no scored point.
pub fn nearest_ink_distance<T: Cell>(
    a: &Mask<T>,
    b: &Mask<T>,
    params: &NearestInkParams,
) -> InkMatchResult<f64> {
    params.validate()?;
    a.same_size(b)?;

    let order = a
        .ink_count()
        .cmp(&b.ink_count())
        .then_with(|| cell_order(a, b));
    let (reference, test) = if order == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    };

    let width = reference.width();
    let height = reference.height();
    let radius_x = window_radius(params.tolerance, width);
    let radius_y = window_radius(params.tolerance, height);
    let unmatched = match params.unmatched {
        UnmatchedPolicy::Diagonal => Some(diagonal(width, height)),
        UnmatchedPolicy::Fixed(d) => Some(d),
        UnmatchedPolicy::Ignore => None,
    };

    let mut test_points = 0usize;
    let mut scored = 0usize;
    let mut sum = 0.0f64;
    for (x, y) in test.ink_cells() {
        test_points += 1;
        let x0 = x.saturating_sub(radius_x);
        let x1 = x.saturating_add(radius_x).min(width - 1);
        let y0 = y.saturating_sub(radius_y);
        let y1 = y.saturating_add(radius_y).min(height - 1);

        let mut best_sq: Option<usize> = None;
        for ry in y0..=y1 {
            let dy = ry.abs_diff(y);
            for rx in x0..=x1 {
                if !reference.cell(rx, ry).is_ink() {
                    continue;
                }
                let dx = rx.abs_diff(x);
                let d_sq = dx * dx + dy * dy;
                if best_sq.map_or(true, |best| d_sq < best) {
                    best_sq = Some(d_sq);
                }
            }
        }

        match (best_sq, unmatched) {
            (Some(d_sq), _) => {
                sum += (d_sq as f64).sqrt();
                scored += 1;
            }
            (None, Some(far)) => {
                sum += far;
                scored += 1;
            }
            (None, None) => {}
        }
    }

    if test_points == 0 {
        return Err(InkMatchError::EmptyMask {
            context: "nearest-ink test mask",
        });
    }
    mean(sum, scored).ok_or(InkMatchError::DegenerateMask {
        reason: "no test ink within the tolerance window",
    })
}

#[cfg(test)]
mod tests {
    use super::{nearest_ink_distance, NearestInkParams, UnmatchedPolicy};
    use crate::mask::{BinaryMask, Mask};
    use crate::util::InkMatchError;

    fn parse(rows: &[&str]) -> BinaryMask {
        let width = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '#'))
            .collect();
        Mask::new(data, width, rows.len()).unwrap()
    }

    #[test]
    fn identical_masks_score_zero() {
        let mask = parse(&["#..#", ".##.", "#..#"]);
        let d = nearest_ink_distance(&mask, &mask, &NearestInkParams::with_tolerance(0.0)).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn shifted_point_scores_its_offset() {
        let a = parse(&["#...", "....", "...."]);
        let b = parse(&["....", "....", ".#.."]);
        let d = nearest_ink_distance(&a, &b, &NearestInkParams::with_tolerance(1.0)).unwrap();
        assert!((d - 5.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn fewer_ink_side_is_reference() {
        // b has more ink, so every b point is matched against a's single cell.
        let a = parse(&["#..", "...", "..."]);
        let b = parse(&["#..", "...", "..#"]);
        let d = nearest_ink_distance(&a, &b, &NearestInkParams::with_tolerance(1.0)).unwrap();
        let expected = (0.0 + 8.0f64.sqrt()) / 2.0;
        assert!((d - expected).abs() < 1e-12);
    }

    #[test]
    fn equal_ink_counts_are_order_independent() {
        let a = parse(&["#..#"]);
        let b = parse(&["##.."]);
        let params = NearestInkParams::with_tolerance(1.0);
        // a sorts first, so it is the reference: b's (1, 0) is one cell from a's (0, 0).
        assert_eq!(nearest_ink_distance(&a, &b, &params).unwrap(), 0.5);
        assert_eq!(nearest_ink_distance(&b, &a, &params).unwrap(), 0.5);
    }

    #[test]
    fn out_of_window_points_use_the_sentinel() {
        let a = parse(&["#...", "....", "....", "...."]);
        let b = parse(&["#...", "....", "....", "...#"]);
        let params = NearestInkParams::with_tolerance(0.25);
        let d = nearest_ink_distance(&a, &b, &params).unwrap();
        let expected = (0.0 + 32.0f64.sqrt()) / 2.0;
        assert!((d - expected).abs() < 1e-12);

        let fixed = NearestInkParams {
            unmatched: UnmatchedPolicy::Fixed(10.0),
            ..params
        };
        let d = nearest_ink_distance(&a, &b, &fixed).unwrap();
        assert!((d - 5.0).abs() < 1e-12);

        let ignore = NearestInkParams {
            unmatched: UnmatchedPolicy::Ignore,
            ..params
        };
        assert_eq!(nearest_ink_distance(&a, &b, &ignore).unwrap(), 0.0);
    }

    #[test]
    fn ignore_with_nothing_scored_is_degenerate() {
        let a = BinaryMask::filled(2, 2, false).unwrap();
        let b = parse(&["#.", ".."]);
        let params = NearestInkParams {
            tolerance: 1.0,
            unmatched: UnmatchedPolicy::Ignore,
        };
        assert!(matches!(
            nearest_ink_distance(&a, &b, &params),
            Err(InkMatchError::DegenerateMask { .. })
        ));
    }

    #[test]
    fn blank_pair_is_an_empty_mask_error() {
        let blank = BinaryMask::filled(3, 3, false).unwrap();
        let err =
            nearest_ink_distance(&blank, &blank, &NearestInkParams::default()).unwrap_err();
        assert!(matches!(err, InkMatchError::EmptyMask { .. }));
    }

    #[test]
    fn tolerance_is_validated() {
        let mask = parse(&["#"]);
        for bad in [-0.1, 1.5, f64::NAN] {
            let err = nearest_ink_distance(&mask, &mask, &NearestInkParams::with_tolerance(bad))
                .unwrap_err();
            assert!(matches!(
                err,
                InkMatchError::InvalidParameter {
                    name: "tolerance",
                    ..
                }
            ));
        }
    }
}
