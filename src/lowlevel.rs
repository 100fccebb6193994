//! Low-level building blocks for custom comparison pipelines.
//!
//! These expose the individual metrics, the summed-area table, and the
//! selection helpers used by [`ShapeMatcher`](crate::ShapeMatcher). Most users
//! should prefer the matcher.

pub use crate::distance::{
    direct_distance, integral_normalized_distance, integral_raw_distance, nearest_ink_distance,
    SummedAreaTable,
};
pub use crate::mask::{is_ink_pixel, InkBounds};
pub use crate::rank::{select_min, select_smallest_k};
