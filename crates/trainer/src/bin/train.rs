//! trip-train - fit the trip duration model from CSV files

use anyhow::{Context, Result};
use clap::Parser;
use feature_engine::{FeatureEngineer, FeatureSchema, BASELINE_IQR_MULTIPLIER, FINAL_IQR_MULTIPLIER};
use std::path::PathBuf;
use tracing::info;
use trainer::{init_logging, load_many, load_trips, train, TrainConfig};

#[derive(Parser)]
#[command(name = "trip-train")]
#[command(author, version, about = "Train the trip duration ridge model", long_about = None)]
struct Cli {
    /// Training CSV files, concatenated in order
    #[arg(short, long, required = true, num_args = 1..)]
    train: Vec<PathBuf>,

    /// Validation CSV file
    #[arg(short, long)]
    validation: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(short, long, default_value = "models/trip_duration_ridge.bin")]
    output: PathBuf,

    /// Fit and report only, do not write the artifact
    #[arg(long)]
    dry_run: bool,

    /// Ridge regularisation strength
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Feature schema: inference or experiment
    #[arg(long, default_value = "inference")]
    schema: String,

    /// Use the looser baseline IQR multiplier
    #[arg(long)]
    baseline: bool,

    /// Emit debug logs
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });

    let schema: FeatureSchema = cli.schema.parse().context("invalid --schema")?;
    let mut config = TrainConfig {
        alpha: cli.alpha,
        ..TrainConfig::default()
    };
    config.preprocess.schema = schema;
    config.preprocess.outlier.multiplier = if cli.baseline {
        BASELINE_IQR_MULTIPLIER
    } else {
        FINAL_IQR_MULTIPLIER
    };

    let train_trips = load_many(&cli.train[..]).context("loading training data")?;
    let validation_trips = cli
        .validation
        .as_ref()
        .map(load_trips)
        .transpose()
        .context("loading validation data")?;

    let engineer = FeatureEngineer::default();
    let (artifact, report) = train(train_trips, validation_trips, &config, &engineer)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if cli.dry_run {
        info!("Dry run, artifact not written");
    } else {
        artifact
            .save(&cli.output)
            .with_context(|| format!("saving model to {}", cli.output.display()))?;
    }

    Ok(())
}
