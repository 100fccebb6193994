//! Ranking a query shape against a set of candidates.
//!
//! Each candidate is decoded, classified, trimmed and scored against a copy of
//! the query rescaled to the candidate's trimmed size. Candidates are scored
//! independently (in parallel with the `rayon` feature) into slots pre-sized to
//! the candidate count, and selection only starts once every slot is filled.

mod select;

pub use select::{select_min, select_smallest_k};

use crate::dataset::{CandidateFile, Decoder};
use crate::distance::Metric;
use crate::image::PixelGrid;
use crate::mask::BinaryMask;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{InkMatchError, InkMatchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handling of faults confined to one candidate (decode failures, bad grids,
/// pairs a metric cannot score).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Leave the candidate out of the ranking and report it as skipped.
    #[default]
    Skip,
    /// Abort the whole ranking with the candidate's error.
    Abort,
}

/// Ranking configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Distance metric used for every candidate.
    pub metric: Metric,
    /// Score candidates on the rayon pool (ignored without the `rayon` feature).
    pub parallel: bool,
    /// What to do when a single candidate cannot be decoded, classified or scored.
    pub on_decode_error: FaultPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            parallel: true,
            on_decode_error: FaultPolicy::Skip,
        }
    }
}

/// Distance from the query to one candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceResult {
    pub key: String,
    pub distance: f64,
}

/// A candidate left out of the ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedCandidate {
    pub key: String,
    pub reason: String,
}

/// Scores for every candidate of a ranking run, in listing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankReport {
    results: Vec<DistanceResult>,
    skipped: Vec<SkippedCandidate>,
}

impl RankReport {
    /// Scored candidates in listing order.
    pub fn results(&self) -> &[DistanceResult] {
        &self.results
    }

    /// Candidates dropped under [`FaultPolicy::Skip`], in listing order.
    pub fn skipped(&self) -> &[SkippedCandidate] {
        &self.skipped
    }

    /// The closest candidate; the first listed wins ties.
    pub fn best(&self) -> InkMatchResult<&DistanceResult> {
        select_min(&self.results).ok_or(InkMatchError::EmptyDataset)
    }

    /// The `k` closest candidates in ascending distance order.
    ///
    /// `k` is bounded by the number of scored candidates.
    pub fn top_k(&self, k: usize) -> InkMatchResult<Vec<DistanceResult>> {
        select_smallest_k(&self.results, k)
    }
}

enum Outcome {
    Scored(f64),
    Skipped(String),
}

trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for CandidateFile {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Keyed for (String, PixelGrid) {
    fn key(&self) -> &str {
        &self.0
    }
}

/// Ranks candidates by shape distance to a fixed query.
pub struct ShapeMatcher {
    query: BinaryMask,
    cfg: MatchConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl ShapeMatcher {
    /// Creates a matcher for `query`, which is trimmed to its ink bounds.
    ///
    /// Fails with `EmptyMask` when the query holds no ink.
    pub fn new(query: BinaryMask) -> InkMatchResult<Self> {
        if query.is_blank() {
            return Err(InkMatchError::EmptyMask { context: "query" });
        }
        Ok(Self {
            query: query.trim(),
            cfg: MatchConfig::default(),
            cancel: None,
        })
    }

    /// Creates a matcher from a decoded query image.
    pub fn from_pixels(grid: &PixelGrid) -> InkMatchResult<Self> {
        Self::new(BinaryMask::from_pixels(grid)?)
    }

    /// Replaces the ranking configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Installs a flag that aborts outstanding work once set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Returns the trimmed query mask.
    pub fn query(&self) -> &BinaryMask {
        &self.query
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Scores one candidate mask against the query.
    ///
    /// The candidate is trimmed and the query is rescaled to the candidate's
    /// trimmed size; the candidate's geometry is never resampled.
    ///
    /// Downscaling can leave the query without ink, so a metric that cannot be
    /// defined on the pair reports `Unscorable`, a candidate fault.
    pub fn score_mask(&self, candidate: &BinaryMask) -> InkMatchResult<f64> {
        let candidate = candidate.trim();
        let (width, height) = candidate.dimensions();
        let query = self.query.scale(width, height)?;
        self.cfg
            .metric
            .distance(&candidate, &query)
            .map_err(|err| match err {
                InkMatchError::EmptyMask { .. } | InkMatchError::DegenerateMask { .. } => {
                    InkMatchError::Unscorable {
                        source: Box::new(err),
                    }
                }
                other => other,
            })
    }

    /// Scores one decoded candidate image against the query.
    pub fn score_grid(&self, grid: &PixelGrid) -> InkMatchResult<f64> {
        self.score_mask(&BinaryMask::from_pixels(grid)?)
    }

    /// Ranks already decoded candidates.
    pub fn score_grids(&self, candidates: &[(String, PixelGrid)]) -> InkMatchResult<RankReport> {
        self.run(candidates, |(_, grid)| self.score_grid(grid))
    }

    /// Decodes and ranks candidate files.
    ///
    /// Decoding happens inside the workers, so it is parallelised together
    /// with scoring.
    pub fn score_dataset<D: Decoder>(
        &self,
        candidates: &[CandidateFile],
        decoder: &D,
    ) -> InkMatchResult<RankReport> {
        self.run(candidates, |candidate| {
            let grid = decoder.decode(&candidate.path)?;
            self.score_grid(&grid)
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn run<S, F>(&self, items: &[S], score: F) -> InkMatchResult<RankReport>
    where
        S: Keyed + Sync,
        F: Fn(&S) -> InkMatchResult<f64> + Sync,
    {
        if items.is_empty() {
            return Err(InkMatchError::EmptyDataset);
        }
        self.cfg.metric.validate()?;

        let _span = trace_span!(
            "rank_candidates",
            candidates = items.len(),
            metric = self.cfg.metric.name()
        )
        .entered();

        let worker = |item: &S| -> InkMatchResult<Outcome> {
            if self.is_cancelled() {
                return Err(InkMatchError::Cancelled);
            }
            trace_event!("computing_distance", key = item.key());
            self.settle(item.key(), score(item))
        };
        let outcomes = if self.cfg.parallel {
            dispatch_parallel(items, worker)
        } else {
            items.iter().map(worker).collect()
        };
        if self.is_cancelled() {
            return Err(InkMatchError::Cancelled);
        }

        let mut report = RankReport::default();
        for (item, outcome) in items.iter().zip(outcomes) {
            match outcome? {
                Outcome::Scored(distance) => report.results.push(DistanceResult {
                    key: item.key().to_string(),
                    distance,
                }),
                Outcome::Skipped(reason) => report.skipped.push(SkippedCandidate {
                    key: item.key().to_string(),
                    reason,
                }),
            }
        }

        trace_event!(
            "ranking_done",
            scored = report.results.len(),
            skipped = report.skipped.len()
        );
        Ok(report)
    }

    fn settle(&self, key: &str, scored: InkMatchResult<f64>) -> InkMatchResult<Outcome> {
        match scored {
            Ok(distance) => {
                trace_event!("candidate_scored", key = key, distance = distance);
                Ok(Outcome::Scored(distance))
            }
            Err(err) if err.is_candidate_fault() && self.cfg.on_decode_error == FaultPolicy::Skip => {
                let reason = err.to_string();
                trace_warn!("candidate_skipped", key = key, reason = reason.as_str());
                Ok(Outcome::Skipped(reason))
            }
            Err(err) => Err(err),
        }
    }
}

/// Scores every item on the rayon pool; output order matches `items`.
#[cfg(feature = "rayon")]
fn dispatch_parallel<S, W>(items: &[S], worker: W) -> Vec<InkMatchResult<Outcome>>
where
    S: Sync,
    W: Fn(&S) -> InkMatchResult<Outcome> + Sync + Send,
{
    items.par_iter().map(worker).collect()
}

#[cfg(not(feature = "rayon"))]
fn dispatch_parallel<S, W>(items: &[S], worker: W) -> Vec<InkMatchResult<Outcome>>
where
    W: Fn(&S) -> InkMatchResult<Outcome>,
{
    items.iter().map(worker).collect()
}

#[cfg(test)]
mod tests {
    use super::{FaultPolicy, MatchConfig, ShapeMatcher};
    use crate::distance::{Metric, NearestInkParams};
    use crate::image::{PixelGrid, Rgba};
    use crate::mask::{BinaryMask, Mask};
    use crate::util::InkMatchError;

    fn grid(rows: &[&str]) -> PixelGrid {
        let width = rows[0].len();
        let pixels = rows
            .iter()
            .flat_map(|row| {
                row.chars()
                    .map(|c| if c == '#' { Rgba::BLACK } else { Rgba::WHITE })
            })
            .collect();
        PixelGrid::new(pixels, width, rows.len()).unwrap()
    }

    #[test]
    fn query_is_trimmed_on_construction() {
        let query = Mask::new(vec![false, false, false, true], 2, 2).unwrap();
        let matcher = ShapeMatcher::new(query).unwrap();
        assert_eq!(matcher.query().dimensions(), (1, 1));
    }

    #[test]
    fn blank_query_is_rejected() {
        let blank = BinaryMask::filled(2, 3, false).unwrap();
        assert!(matches!(
            ShapeMatcher::new(blank),
            Err(InkMatchError::EmptyMask { context: "query" })
        ));
        assert!(matches!(
            ShapeMatcher::from_pixels(&grid(&["..", "..", ".."])),
            Err(InkMatchError::EmptyMask { .. })
        ));
    }

    #[test]
    fn score_mask_scales_query_to_candidate() {
        let matcher = ShapeMatcher::from_pixels(&grid(&["##", "##"])).unwrap();
        let candidate = BinaryMask::filled(5, 3, true).unwrap();
        assert_eq!(matcher.score_mask(&candidate).unwrap(), 0.0);
    }

    #[test]
    fn empty_candidate_list_fails_first() {
        let matcher = ShapeMatcher::from_pixels(&grid(&["#"])).unwrap();
        assert_eq!(
            matcher.score_grids(&[]).unwrap_err(),
            InkMatchError::EmptyDataset
        );
    }

    #[test]
    fn skip_policy_reports_bad_candidates() {
        let matcher = ShapeMatcher::from_pixels(&grid(&["#"])).unwrap();
        let decode = |path: &std::path::Path| -> crate::util::InkMatchResult<PixelGrid> {
            if path.ends_with("broken.png") {
                Err(InkMatchError::Decode {
                    path: path.display().to_string(),
                    reason: "bad header".into(),
                })
            } else {
                Ok(grid(&["#"]))
            }
        };
        let files = vec![
            crate::dataset::CandidateFile::from_path("set/broken.png"),
            crate::dataset::CandidateFile::from_path("set/dot.png"),
        ];

        let report = matcher.score_dataset(&files, &decode).unwrap();
        assert_eq!(report.results().len(), 1);
        assert_eq!(report.skipped()[0].key, "broken.png");
        assert_eq!(report.best().unwrap().key, "dot.png");

        let aborting = ShapeMatcher::from_pixels(&grid(&["#"]))
            .unwrap()
            .with_config(MatchConfig {
                on_decode_error: FaultPolicy::Abort,
                ..MatchConfig::default()
            });
        assert!(matches!(
            aborting.score_dataset(&files, &decode),
            Err(InkMatchError::Decode { .. })
        ));
    }

    #[test]
    fn engine_errors_abort_even_when_skipping() {
        let matcher = ShapeMatcher::from_pixels(&grid(&["#"]))
            .unwrap()
            .with_config(MatchConfig {
                metric: Metric::NearestInk(NearestInkParams::with_tolerance(-1.0)),
                ..MatchConfig::default()
            });
        let candidates = vec![("ink".to_string(), grid(&["#"]))];
        assert!(matches!(
            matcher.score_grids(&candidates),
            Err(InkMatchError::InvalidParameter {
                name: "tolerance",
                ..
            })
        ));
    }

    #[test]
    fn blank_candidate_is_skipped_under_normalized_integral() {
        let matcher = ShapeMatcher::from_pixels(&grid(&["#"]))
            .unwrap()
            .with_config(MatchConfig {
                metric: Metric::IntegralNormalized,
                ..MatchConfig::default()
            });
        let candidates = vec![
            ("ink".to_string(), grid(&["#"])),
            ("blank".to_string(), grid(&["."])),
        ];
        let report = matcher.score_grids(&candidates).unwrap();
        assert_eq!(report.results().len(), 1);
        assert_eq!(report.skipped()[0].key, "blank");
        assert!(report.skipped()[0].reason.starts_with("candidate cannot be scored"));
    }
}
