use clap::{Parser, ValueEnum};
use inkmatch::io::load_pixel_grid;
use inkmatch::{
    list_candidates, DistanceResult, FaultPolicy, ImageDecoder, InkMatchResult, MatchConfig,
    Metric, NearestInkParams, RankReport, ShapeMatcher, SkippedCandidate, UnmatchedPolicy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find the dataset image closest in shape to a query image"
)]
struct Cli {
    /// Directory holding the candidate images.
    dataset_dir: Option<PathBuf>,
    /// Query image to match against the dataset.
    query: Option<PathBuf>,
    /// JSON configuration file; command-line values take precedence.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Distance metric.
    #[arg(short, long, value_enum)]
    metric: Option<MetricConfig>,
    /// Search window for nearest-ink matching, as a fraction of the mask size.
    #[arg(short, long)]
    tolerance: Option<f64>,
    /// Number of closest matches to report.
    #[arg(short = 'k', long)]
    top_k: Option<usize>,
    /// Score candidates one at a time.
    #[arg(long)]
    sequential: bool,
    /// Fail the run on the first unreadable candidate instead of skipping it.
    #[arg(long)]
    abort_on_decode_error: bool,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, ValueEnum)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    NearestInk,
    IntegralNormalized,
    IntegralRaw,
    Direct,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum UnmatchedConfig {
    Diagonal,
    Fixed,
    Ignore,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum FaultPolicyConfig {
    Skip,
    Abort,
}

impl From<FaultPolicyConfig> for FaultPolicy {
    fn from(value: FaultPolicyConfig) -> Self {
        match value {
            FaultPolicyConfig::Skip => FaultPolicy::Skip,
            FaultPolicyConfig::Abort => FaultPolicy::Abort,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    metric: MetricConfig,
    tolerance: f64,
    unmatched: UnmatchedConfig,
    unmatched_distance: Option<f64>,
    parallel: bool,
    on_decode_error: FaultPolicyConfig,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            metric: MetricConfig::NearestInk,
            tolerance: NearestInkParams::default().tolerance,
            unmatched: UnmatchedConfig::Diagonal,
            unmatched_distance: None,
            parallel: cfg.parallel,
            on_decode_error: FaultPolicyConfig::Skip,
        }
    }
}

impl MatchConfigJson {
    fn metric(&self) -> Result<Metric, Box<dyn std::error::Error>> {
        let metric = match self.metric {
            MetricConfig::NearestInk => {
                let unmatched = match self.unmatched {
                    UnmatchedConfig::Diagonal => UnmatchedPolicy::Diagonal,
                    UnmatchedConfig::Ignore => UnmatchedPolicy::Ignore,
                    UnmatchedConfig::Fixed => UnmatchedPolicy::Fixed(
                        self.unmatched_distance
                            .ok_or("unmatched_distance must be set when unmatched is \"fixed\"")?,
                    ),
                };
                Metric::NearestInk(NearestInkParams {
                    tolerance: self.tolerance,
                    unmatched,
                })
            }
            MetricConfig::IntegralNormalized => Metric::IntegralNormalized,
            MetricConfig::IntegralRaw => Metric::IntegralRaw,
            MetricConfig::Direct => Metric::Direct,
        };
        Ok(metric)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    dataset_dir: Option<PathBuf>,
    query_path: Option<PathBuf>,
    topk: usize,
    output_path: Option<PathBuf>,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_dir: None,
            query_path: None,
            topk: 1,
            output_path: None,
            match_cfg: MatchConfigJson::default(),
        }
    }
}

impl Cli {
    /// Overrides config values with anything given on the command line.
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.dataset_dir {
            config.dataset_dir = Some(dir.clone());
        }
        if let Some(query) = &self.query {
            config.query_path = Some(query.clone());
        }
        if let Some(metric) = self.metric {
            config.match_cfg.metric = metric;
        }
        if let Some(tolerance) = self.tolerance {
            config.match_cfg.tolerance = tolerance;
        }
        if let Some(k) = self.top_k {
            config.topk = k;
        }
        if self.sequential {
            config.match_cfg.parallel = false;
        }
        if self.abort_on_decode_error {
            config.match_cfg.on_decode_error = FaultPolicyConfig::Abort;
        }
    }
}

#[derive(Debug, Serialize)]
struct DistanceRecord {
    key: String,
    distance: f64,
}

impl From<DistanceResult> for DistanceRecord {
    fn from(value: DistanceResult) -> Self {
        Self {
            key: value.key,
            distance: value.distance,
        }
    }
}

#[derive(Debug, Serialize)]
struct SkippedRecord {
    key: String,
    reason: String,
}

impl From<SkippedCandidate> for SkippedRecord {
    fn from(value: SkippedCandidate) -> Self {
        Self {
            key: value.key,
            reason: value.reason,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    metric: &'static str,
    best: DistanceRecord,
    topk: Vec<DistanceRecord>,
    results: Vec<DistanceRecord>,
    skipped: Vec<SkippedRecord>,
}

impl Output {
    /// Selects the winner before the top-k list, so a run with nothing scored
    /// fails as an empty dataset rather than as an out-of-range `k`.
    fn from_report(metric: &Metric, report: &RankReport, k: usize) -> InkMatchResult<Self> {
        let best = report.best()?.clone();
        let topk = report.top_k(k)?;
        Ok(Self::new(metric, report, best, topk))
    }

    fn new(
        metric: &Metric,
        report: &RankReport,
        best: DistanceResult,
        topk: Vec<DistanceResult>,
    ) -> Self {
        Self {
            metric: metric.name(),
            best: DistanceRecord::from(best),
            topk: topk.into_iter().map(DistanceRecord::from).collect(),
            results: report
                .results()
                .iter()
                .cloned()
                .map(DistanceRecord::from)
                .collect(),
            skipped: report
                .skipped()
                .iter()
                .cloned()
                .map(SkippedRecord::from)
                .collect(),
        }
    }
}

fn write_text<W: Write>(out: &mut W, output: &Output) -> io::Result<()> {
    for record in &output.results {
        writeln!(out, "{}: {:.6}", record.key, record.distance)?;
    }
    writeln!(out)?;
    for record in &output.topk {
        writeln!(out, "closest match: {} {:.6}", record.key, record.distance)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("inkmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let mut config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    cli.apply(&mut config);

    let dataset_dir = config
        .dataset_dir
        .clone()
        .ok_or("a dataset directory must be given on the command line or in the config")?;
    let query_path = config
        .query_path
        .clone()
        .ok_or("a query image must be given on the command line or in the config")?;
    let metric = config.match_cfg.metric()?;

    let query = load_pixel_grid(&query_path)?;
    let matcher = ShapeMatcher::from_pixels(&query)?.with_config(MatchConfig {
        metric,
        parallel: config.match_cfg.parallel,
        on_decode_error: config.match_cfg.on_decode_error.into(),
    });
    tracing::info!(
        query = %query_path.display(),
        width = matcher.query().width(),
        height = matcher.query().height(),
        "query trimmed"
    );

    let candidates = list_candidates(&dataset_dir)?;
    tracing::info!(
        dataset = %dataset_dir.display(),
        candidates = candidates.len(),
        "dataset listed"
    );

    let report = matcher.score_dataset(&candidates, &ImageDecoder)?;
    let output = Output::from_report(&metric, &report, config.topk)?;

    match (&config.output_path, cli.json) {
        (Some(path), _) => fs::write(path, serde_json::to_string_pretty(&output)?)?,
        (None, true) => println!("{}", serde_json::to_string_pretty(&output)?),
        (None, false) => {
            for skipped in &output.skipped {
                eprintln!("skipped {}: {}", skipped.key, skipped.reason);
            }
            write_text(&mut io::stdout().lock(), &output)?;
        }
    }

    Ok(())
}
