//! trip-evaluate - score a saved model on a labelled CSV

use anyhow::{Context, Result};
use clap::Parser;
use feature_engine::FeatureEngineer;
use inference_engine::ModelArtifact;
use std::path::PathBuf;
use trainer::{evaluate, init_logging, load_trips};

#[derive(Parser)]
#[command(name = "trip-evaluate")]
#[command(author, version, about = "Evaluate a saved trip duration model", long_about = None)]
struct Cli {
    /// Model artifact written by trip-train
    #[arg(long, default_value = "models/trip_duration_ridge.bin")]
    model_path: PathBuf,

    /// Labelled test CSV
    #[arg(long, default_value = "data/split/test.csv")]
    test_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("info");

    let artifact = ModelArtifact::load(&cli.model_path)
        .with_context(|| format!("loading model {}", cli.model_path.display()))?;
    let trips = load_trips(&cli.test_path).context("loading test data")?;

    let evaluation = evaluate(&artifact, trips, &FeatureEngineer::default())?;
    println!(
        "TestSet RMSE = {:.4} - R2 = {:.4} ({} rows)",
        evaluation.scores.rmse, evaluation.scores.r2, evaluation.rows
    );
    Ok(())
}
