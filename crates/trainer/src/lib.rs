//! Trip Duration Trainer
//!
//! Offline pipeline that turns labelled trip CSVs into a saved model
//! artifact, and scores saved artifacts on held-out data.

mod dataset;
mod error;
mod preprocess;
mod train;

#[cfg(test)]
mod testing;

pub use dataset::{load_many, load_trips, read_trips, LabeledTrip, RawTrip};
pub use error::TrainerError;
pub use preprocess::{prepare, PreparedData, PreprocessConfig};
pub use train::{evaluate, train, Evaluation, TrainConfig, TrainingReport};

use tracing_subscriber::EnvFilter;

/// Initialize logging for the command-line tools.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
