//! InkMatch finds the reference glyph closest in shape to a scanned mark.
//!
//! Images are classified into binary ink masks (opaque black is ink), cropped
//! to their ink bounds and compared after rescaling the query onto each
//! candidate. Two families of distance are provided: a nearest-ink-point
//! distance with a tolerance window, and summed-area-table differences. The
//! ranking fan-out runs on rayon when the `rayon` feature is enabled.

pub mod dataset;
pub mod distance;
pub mod image;
pub mod lowlevel;
pub mod mask;
pub mod rank;
mod trace;
pub mod util;

pub use dataset::{list_candidates, CandidateFile, Decoder};
pub use distance::{Metric, NearestInkParams, UnmatchedPolicy};
pub use crate::image::{Bounds, PixelGrid, Rgba};
pub use mask::{BinaryMask, Cell, IntensityMask, Mask};
pub use rank::{
    DistanceResult, FaultPolicy, MatchConfig, RankReport, ShapeMatcher, SkippedCandidate,
};
pub use util::{InkMatchError, InkMatchResult};

#[cfg(feature = "image-io")]
pub use dataset::ImageDecoder;
#[cfg(feature = "image-io")]
pub use crate::image::io;
