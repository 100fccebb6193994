#![cfg(feature = "rayon")]

use inkmatch::{
    BinaryMask, FaultPolicy, InkMatchError, MatchConfig, Metric, NearestInkParams, PixelGrid,
    Rgba, ShapeMatcher,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_grid(rng: &mut StdRng) -> PixelGrid {
    let width = rng.random_range(1..=32);
    let height = rng.random_range(1..=32);
    PixelGrid::from_fn(width, height, |_, _| {
        if rng.random_bool(0.25) {
            Rgba::BLACK
        } else {
            Rgba::WHITE
        }
    })
    .unwrap()
}

fn make_dataset(seed: u64, len: usize) -> Vec<(String, PixelGrid)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|idx| (format!("glyph_{idx:03}.png"), random_grid(&mut rng)))
        .collect()
}

#[test]
fn parallel_matches_sequential() {
    let dataset = make_dataset(42, 64);
    let query = BinaryMask::from_fn(12, 12, |x, y| x == y || x + y == 11).unwrap();

    for metric in [
        Metric::NearestInk(NearestInkParams::with_tolerance(0.2)),
        Metric::IntegralRaw,
        Metric::Direct,
    ] {
        let seq = ShapeMatcher::new(query.clone()).unwrap().with_config(MatchConfig {
            metric,
            parallel: false,
            ..MatchConfig::default()
        });
        let par = ShapeMatcher::new(query.clone()).unwrap().with_config(MatchConfig {
            metric,
            parallel: true,
            ..MatchConfig::default()
        });

        let seq_report = seq.score_grids(&dataset).unwrap();
        let par_report = par.score_grids(&dataset).unwrap();
        assert_eq!(seq_report, par_report, "{}", metric.name());
        assert_eq!(seq_report.top_k(5).unwrap(), par_report.top_k(5).unwrap());
    }
}

#[test]
fn parallel_error_is_the_first_listed_failure() {
    let mut dataset = make_dataset(9, 16);
    let blank = PixelGrid::new(vec![Rgba::WHITE; 4], 2, 2).unwrap();
    dataset.insert(3, ("blank_a".to_string(), blank.clone()));
    dataset.insert(10, ("blank_b".to_string(), blank));

    let query = BinaryMask::filled(3, 3, true).unwrap();
    let seq = ShapeMatcher::new(query.clone()).unwrap().with_config(MatchConfig {
        metric: Metric::IntegralNormalized,
        parallel: false,
        on_decode_error: FaultPolicy::Abort,
    });
    let par = ShapeMatcher::new(query).unwrap().with_config(MatchConfig {
        metric: Metric::IntegralNormalized,
        parallel: true,
        on_decode_error: FaultPolicy::Abort,
    });
    let seq_err = seq.score_grids(&dataset).unwrap_err();
    assert!(matches!(seq_err, InkMatchError::Unscorable { .. }));
    assert_eq!(seq_err, par.score_grids(&dataset).unwrap_err());
}
