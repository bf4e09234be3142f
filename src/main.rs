use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Args, Parser};
use tracing::info;

use fossil_estimate::{
    DEFAULT_DATA_PATH, DEFAULT_PREVIEW_LIMIT, EmptyInputMode, PipelineConfig, Request, Response,
    handle,
};
use fossil_rf::{DEFAULT_N_TREES, MaxFeatures, RandomForestConfig, SplitMethod};

#[derive(Parser, Debug)]
#[command(name = "fossil-value")]
#[command(about = "Estimate the market value range of a dinosaur fossil from historical sales")]
#[command(version)]
struct Cli {
    /// Taxonomic family, e.g. Theropoda
    #[arg(required_unless_present_any = ["options", "preview"])]
    family: Option<String>,

    /// Body part, e.g. Skull
    #[arg(required_unless_present_any = ["options", "preview"])]
    body_part: Option<String>,

    /// List the available families and body parts without estimating
    #[arg(long, conflicts_with = "preview")]
    options: bool,

    /// Print the first N cleaned records (default 30)
    #[arg(long, value_name = "N", num_args = 0..=1)]
    preview: Option<Option<usize>>,

    /// Path to the transaction CSV
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Empty family or body part: "reject" or "options"
    #[arg(long, default_value = "reject")]
    empty_input: String,

    #[command(flatten)]
    forest: ForestArgs,

    /// Number of threads for tree training (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Log at debug level (requires --log-file)
    #[arg(long, requires = "log_file")]
    verbose: bool,

    /// Only log errors (requires --log-file)
    #[arg(long, conflicts_with = "verbose", requires = "log_file")]
    quiet: bool,

    /// Write logs to this file; without it nothing is logged
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Random forest hyperparameters.
#[derive(Args, Debug, Clone)]
struct ForestArgs {
    /// Number of trees in the forest
    #[arg(long, default_value_t = DEFAULT_N_TREES)]
    n_trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value_t = 15)]
    max_depth: usize,

    /// Grow trees without a depth limit
    #[arg(long, conflicts_with = "max_depth")]
    unlimited_depth: bool,

    /// Minimum samples required to split a node
    #[arg(long, default_value_t = 5)]
    min_samples_split: usize,

    /// Minimum samples required in each leaf
    #[arg(long, default_value_t = 2)]
    min_samples_leaf: usize,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Features tried per split: "all", "sqrt", "log2", a count, or a fraction in (0, 1]
    #[arg(long, default_value = "all")]
    max_features: String,

    /// Split-finding strategy: "exact" or "extra-trees"
    #[arg(long, default_value = "exact")]
    split_method: String,

    /// Fraction of samples drawn (with replacement) per tree
    #[arg(long, default_value_t = 1.0)]
    bootstrap_fraction: f64,
}

impl ForestArgs {
    fn to_config(&self) -> Result<RandomForestConfig> {
        let max_depth = (!self.unlimited_depth).then_some(self.max_depth);
        Ok(RandomForestConfig::new(self.n_trees)?
            .with_max_depth(max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_seed(self.seed)
            .with_max_features(parse_max_features(&self.max_features)?)
            .with_split_method(parse_split_method(&self.split_method)?)
            .with_bootstrap_fraction(self.bootstrap_fraction))
    }
}

impl Cli {
    fn request(&self) -> Request {
        if let Some(limit) = self.preview {
            return Request::Preview {
                limit: limit.unwrap_or(DEFAULT_PREVIEW_LIMIT),
            };
        }
        if self.options {
            return Request::Options;
        }
        Request::estimate(
            self.family.clone().unwrap_or_default(),
            self.body_part.clone().unwrap_or_default(),
        )
    }
}

fn parse_split_method(s: &str) -> Result<SplitMethod> {
    match s {
        "exact" => Ok(SplitMethod::Exact),
        "extra-trees" => Ok(SplitMethod::ExtraTrees),
        other => anyhow::bail!("unknown split method: {other} (expected exact or extra-trees)"),
    }
}

fn parse_max_features(s: &str) -> Result<MaxFeatures> {
    match s {
        "all" => Ok(MaxFeatures::All),
        "sqrt" => Ok(MaxFeatures::Sqrt),
        "log2" => Ok(MaxFeatures::Log2),
        other => {
            if let Ok(n) = other.parse::<usize>() {
                return Ok(MaxFeatures::Fixed(n));
            }
            match other.parse::<f64>() {
                Ok(f) if f > 0.0 && f <= 1.0 => Ok(MaxFeatures::Fraction(f)),
                _ => anyhow::bail!(
                    "invalid max features: {other} (expected all, sqrt, log2, a count, or a fraction in (0, 1])"
                ),
            }
        }
    }
}

fn parse_empty_input(s: &str) -> Result<EmptyInputMode> {
    match s {
        "reject" => Ok(EmptyInputMode::Reject),
        "options" => Ok(EmptyInputMode::OptionsOnly),
        other => anyhow::bail!("unknown empty input mode: {other} (expected reject or options)"),
    }
}

fn log_filter(cli: &Cli) -> &'static str {
    match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    }
}

/// Install the file subscriber, if a log file was given.
///
/// stdout and stderr carry only the response JSON, so no subscriber ever
/// writes to them.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).context("failed to open log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(cli: &Cli) -> Result<Response> {
    init_logging(cli)?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let config = PipelineConfig::new(&cli.data)
        .with_forest(cli.forest.to_config()?)
        .with_empty_input(parse_empty_input(&cli.empty_input)?);

    Ok(handle(config, &cli.request()))
}

/// First line of a clap error without its `error:` prefix or usage block.
fn clap_message(err: &clap::Error) -> String {
    let text = err.to_string();
    let first = text.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}

/// Print `response` to stdout on success or stderr on error.
fn emit(response: &Response) -> ExitCode {
    let json = response
        .to_json()
        .unwrap_or_else(|_| r#"{"error":"failed to render response"}"#.to_string());
    if response.is_error() {
        eprintln!("{json}");
        ExitCode::FAILURE
    } else {
        println!("{json}");
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            return emit(&Response::Error {
                error: clap_message(&err),
            });
        }
    };

    match run(&cli) {
        Ok(response) => emit(&response),
        Err(err) => emit(&Response::Error {
            error: format!("{err:#}"),
        }),
    }
}
