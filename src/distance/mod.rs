//! Shape distance metrics.
//!
//! Every metric takes two masks of identical size and returns a finite,
//! non-negative dissimilarity where lower means more alike. The metric is a
//! runtime choice carried in [`Metric`].

mod direct;
mod integral;
mod nearest;

pub use direct::direct_distance;
pub use integral::{integral_normalized_distance, integral_raw_distance, SummedAreaTable};
pub use nearest::{nearest_ink_distance, NearestInkParams, UnmatchedPolicy};

use crate::mask::{Cell, Mask};
use crate::util::InkMatchResult;

/// Distance metric selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Metric {
    /// Mean distance from each test ink cell to the nearest reference ink cell.
    NearestInk(NearestInkParams),
    /// Summed-area tables normalized by total ink, then mean absolute difference.
    IntegralNormalized,
    /// Raw summed-area tables, mean absolute difference.
    IntegralRaw,
    /// Mean absolute per-cell difference.
    Direct,
}

impl Default for Metric {
    fn default() -> Self {
        Metric::NearestInk(NearestInkParams::default())
    }
}

impl Metric {
    /// Short stable name, used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::NearestInk(_) => "nearest_ink",
            Metric::IntegralNormalized => "integral_normalized",
            Metric::IntegralRaw => "integral_raw",
            Metric::Direct => "direct",
        }
    }

    /// Checks metric parameters without scoring anything.
    pub fn validate(&self) -> InkMatchResult<()> {
        match self {
            Metric::NearestInk(params) => params.validate(),
            _ => Ok(()),
        }
    }

    /// Scores `a` against `b`.
    pub fn distance<T: Cell>(&self, a: &Mask<T>, b: &Mask<T>) -> InkMatchResult<f64> {
        match self {
            Metric::NearestInk(params) => nearest_ink_distance(a, b, params),
            Metric::IntegralNormalized => integral_normalized_distance(a, b),
            Metric::IntegralRaw => integral_raw_distance(a, b),
            Metric::Direct => direct_distance(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Metric, NearestInkParams};
    use crate::mask::Mask;

    #[test]
    fn dispatch_matches_free_functions() {
        let a = Mask::new(vec![true, false, false, true], 2, 2).unwrap();
        let b = Mask::new(vec![false, true, false, true], 2, 2).unwrap();
        assert_eq!(
            Metric::Direct.distance(&a, &b).unwrap(),
            super::direct_distance(&a, &b).unwrap()
        );
        assert_eq!(
            Metric::IntegralRaw.distance(&a, &b).unwrap(),
            super::integral_raw_distance(&a, &b).unwrap()
        );
        let params = NearestInkParams::with_tolerance(0.5);
        assert_eq!(
            Metric::NearestInk(params).distance(&a, &b).unwrap(),
            super::nearest_ink_distance(&a, &b, &params).unwrap()
        );
    }

    #[test]
    fn validate_only_checks_nearest_ink() {
        assert!(Metric::NearestInk(NearestInkParams::with_tolerance(2.0))
            .validate()
            .is_err());
        assert!(Metric::IntegralNormalized.validate().is_ok());
        assert_eq!(Metric::default().name(), "nearest_ink");
    }
}
