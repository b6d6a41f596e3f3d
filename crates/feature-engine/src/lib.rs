//! Trip Feature Engineering
//!
//! Deterministic transformation from validated trip records into model
//! feature rows, shared by the trainer and the inference service, plus the
//! training-only outlier filters.

mod config;
mod error;
mod features;
mod outlier;
mod schema;
mod statistics;
mod temporal;

pub use config::{FeatureConfig, GeoBox};
pub use error::FeatureError;
pub use features::{FeatureEngineer, TripFeatures};
pub use outlier::{
    filter_by_iqr, iqr_bounds, quantile, IqrBounds, IqrSource, OutlierConfig, SanityBounds,
    BASELINE_IQR_MULTIPLIER, FINAL_IQR_MULTIPLIER,
};
pub use schema::{ColumnRole, FeatureColumn, FeatureRow, FeatureSchema};
pub use statistics::{planar_distance, CoordinateStats, DistanceFeatures};
pub use temporal::{is_night, is_rush_hour, ContextFlags, Season, TimeFeatures};
