//! Model Input Schemas
//!
//! The feature engineer always computes the full [`TripFeatures`] set. A
//! [`FeatureSchema`] names the ordered subset a model was trained on and how
//! the model pipeline treats each column, so training and serving can never
//! drift apart by dropping different columns.

use crate::error::FeatureError;
use crate::features::TripFeatures;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every column the feature engineer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    VendorId,
    PassengerCount,
    RequiresLargeVehicle,
    TripDistance,
    TripDistanceSqrt,
    TripDistanceSquare,
    TripDistanceCube,
    LogTripDistance,
    LogTripDistanceSqrt,
    LogTripDistanceSquare,
    LogTripDistanceCube,
    IsJfkAirport,
    IsLgAirport,
    CoordArithmeticMean,
    CoordGeometricMean,
    CoordHarmonicMean,
    CoordSquareSum,
    Month,
    Weekday,
    Hour,
    Minute,
    DayOfYear,
    Season,
    IsSummer,
    IsRushHour,
    IsNight,
    IsWeekend,
    VirtualSpeed,
    VirtualSpeedCube,
    VirtualTime,
    VirtualTimeCube,
    VirtualTimeDistSqrt,
}

impl FeatureColumn {
    pub const ALL: [FeatureColumn; 32] = [
        FeatureColumn::VendorId,
        FeatureColumn::PassengerCount,
        FeatureColumn::RequiresLargeVehicle,
        FeatureColumn::TripDistance,
        FeatureColumn::TripDistanceSqrt,
        FeatureColumn::TripDistanceSquare,
        FeatureColumn::TripDistanceCube,
        FeatureColumn::LogTripDistance,
        FeatureColumn::LogTripDistanceSqrt,
        FeatureColumn::LogTripDistanceSquare,
        FeatureColumn::LogTripDistanceCube,
        FeatureColumn::IsJfkAirport,
        FeatureColumn::IsLgAirport,
        FeatureColumn::CoordArithmeticMean,
        FeatureColumn::CoordGeometricMean,
        FeatureColumn::CoordHarmonicMean,
        FeatureColumn::CoordSquareSum,
        FeatureColumn::Month,
        FeatureColumn::Weekday,
        FeatureColumn::Hour,
        FeatureColumn::Minute,
        FeatureColumn::DayOfYear,
        FeatureColumn::Season,
        FeatureColumn::IsSummer,
        FeatureColumn::IsRushHour,
        FeatureColumn::IsNight,
        FeatureColumn::IsWeekend,
        FeatureColumn::VirtualSpeed,
        FeatureColumn::VirtualSpeedCube,
        FeatureColumn::VirtualTime,
        FeatureColumn::VirtualTimeCube,
        FeatureColumn::VirtualTimeDistSqrt,
    ];

    /// Column name as it appears in training tables
    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::VendorId => "vendor_id",
            FeatureColumn::PassengerCount => "passenger_count",
            FeatureColumn::RequiresLargeVehicle => "requires_large_vehicle",
            FeatureColumn::TripDistance => "trip_distance",
            FeatureColumn::TripDistanceSqrt => "trip_distance_sqrt",
            FeatureColumn::TripDistanceSquare => "trip_distance_square",
            FeatureColumn::TripDistanceCube => "trip_distance_cube",
            FeatureColumn::LogTripDistance => "log_trip_distance",
            FeatureColumn::LogTripDistanceSqrt => "log_trip_distance_sqrt",
            FeatureColumn::LogTripDistanceSquare => "log_trip_distance_square",
            FeatureColumn::LogTripDistanceCube => "log_trip_distance_cube",
            FeatureColumn::IsJfkAirport => "is_jfk_airport",
            FeatureColumn::IsLgAirport => "is_lg_airport",
            FeatureColumn::CoordArithmeticMean => "coord_arithmetic_mean",
            FeatureColumn::CoordGeometricMean => "coord_geometric_mean",
            FeatureColumn::CoordHarmonicMean => "coord_harmonic_mean",
            FeatureColumn::CoordSquareSum => "coord_square_sum",
            FeatureColumn::Month => "month",
            FeatureColumn::Weekday => "weekday",
            FeatureColumn::Hour => "hour",
            FeatureColumn::Minute => "minute",
            FeatureColumn::DayOfYear => "day_of_year",
            FeatureColumn::Season => "season",
            FeatureColumn::IsSummer => "is_summer",
            FeatureColumn::IsRushHour => "is_rush_hour",
            FeatureColumn::IsNight => "is_night",
            FeatureColumn::IsWeekend => "is_weekend",
            FeatureColumn::VirtualSpeed => "virtual_speed",
            FeatureColumn::VirtualSpeedCube => "virtual_speed_cube",
            FeatureColumn::VirtualTime => "virtual_time",
            FeatureColumn::VirtualTimeCube => "virtual_time_cube",
            FeatureColumn::VirtualTimeDistSqrt => "virtual_time_dist_sqrt",
        }
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureColumn {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureColumn::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| FeatureError::UnknownColumn(s.to_string()))
    }
}

/// How the regression pipeline consumes a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// One-hot encoded
    Categorical,
    /// Standardised to zero mean, unit variance
    Scaled,
    /// Fed to the regressor unchanged
    Passthrough,
}

/// Versioned model input schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSchema {
    /// Earlier variant that also feeds the virtual speed columns to the model
    Experiment,
    /// Canonical serving variant
    Inference,
}

const INFERENCE_COLUMNS: [FeatureColumn; 22] = [
    FeatureColumn::VendorId,
    FeatureColumn::PassengerCount,
    FeatureColumn::TripDistance,
    FeatureColumn::TripDistanceSqrt,
    FeatureColumn::TripDistanceSquare,
    FeatureColumn::TripDistanceCube,
    FeatureColumn::LogTripDistance,
    FeatureColumn::LogTripDistanceSqrt,
    FeatureColumn::LogTripDistanceSquare,
    FeatureColumn::LogTripDistanceCube,
    FeatureColumn::IsJfkAirport,
    FeatureColumn::IsLgAirport,
    FeatureColumn::CoordArithmeticMean,
    FeatureColumn::CoordHarmonicMean,
    FeatureColumn::CoordSquareSum,
    FeatureColumn::Month,
    FeatureColumn::Weekday,
    FeatureColumn::Hour,
    FeatureColumn::Minute,
    FeatureColumn::Season,
    FeatureColumn::VirtualTime,
    FeatureColumn::VirtualTimeDistSqrt,
];

const EXPERIMENT_COLUMNS: [FeatureColumn; 24] = [
    FeatureColumn::VendorId,
    FeatureColumn::PassengerCount,
    FeatureColumn::TripDistance,
    FeatureColumn::TripDistanceSqrt,
    FeatureColumn::TripDistanceSquare,
    FeatureColumn::TripDistanceCube,
    FeatureColumn::LogTripDistance,
    FeatureColumn::LogTripDistanceSqrt,
    FeatureColumn::LogTripDistanceSquare,
    FeatureColumn::LogTripDistanceCube,
    FeatureColumn::IsJfkAirport,
    FeatureColumn::IsLgAirport,
    FeatureColumn::CoordArithmeticMean,
    FeatureColumn::CoordHarmonicMean,
    FeatureColumn::CoordSquareSum,
    FeatureColumn::Month,
    FeatureColumn::Weekday,
    FeatureColumn::Hour,
    FeatureColumn::Minute,
    FeatureColumn::Season,
    FeatureColumn::VirtualSpeed,
    FeatureColumn::VirtualSpeedCube,
    FeatureColumn::VirtualTime,
    FeatureColumn::VirtualTimeDistSqrt,
];

impl FeatureSchema {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureSchema::Experiment => "experiment",
            FeatureSchema::Inference => "inference",
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            FeatureSchema::Experiment => 1,
            FeatureSchema::Inference => 2,
        }
    }

    /// Retained columns in model input order
    pub fn columns(&self) -> &'static [FeatureColumn] {
        match self {
            FeatureSchema::Experiment => &EXPERIMENT_COLUMNS,
            FeatureSchema::Inference => &INFERENCE_COLUMNS,
        }
    }

    pub fn width(&self) -> usize {
        self.columns().len()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.name()).collect()
    }

    pub fn contains(&self, column: FeatureColumn) -> bool {
        self.columns().contains(&column)
    }

    /// Pipeline treatment of a retained column
    pub fn role(&self, column: FeatureColumn) -> ColumnRole {
        match column {
            FeatureColumn::Hour
            | FeatureColumn::Season
            | FeatureColumn::PassengerCount
            | FeatureColumn::Month
            | FeatureColumn::IsJfkAirport
            | FeatureColumn::IsLgAirport
            | FeatureColumn::VirtualSpeed
            | FeatureColumn::VirtualSpeedCube => ColumnRole::Categorical,
            FeatureColumn::CoordSquareSum
            | FeatureColumn::CoordArithmeticMean
            | FeatureColumn::CoordHarmonicMean => ColumnRole::Scaled,
            _ => ColumnRole::Passthrough,
        }
    }

    /// Indices into [`FeatureSchema::columns`] having the given role
    pub fn indices_with_role(&self, role: ColumnRole) -> Vec<usize> {
        self.columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| self.role(**c) == role)
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (v{})", self.name(), self.version())
    }
}

impl FromStr for FeatureSchema {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "experiment" => Ok(FeatureSchema::Experiment),
            "inference" => Ok(FeatureSchema::Inference),
            other => Err(FeatureError::UnknownSchema(other.to_string())),
        }
    }
}

/// Model input values for one trip, ordered by its schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureRow {
    /// Build a row from raw values, checking width and finiteness
    pub fn new(schema: FeatureSchema, values: Vec<f64>) -> Result<Self, FeatureError> {
        if values.len() != schema.width() {
            return Err(FeatureError::LengthMismatch {
                schema: schema.name(),
                expected: schema.width(),
                actual: values.len(),
            });
        }
        for (column, value) in schema.columns().iter().zip(&values) {
            if !value.is_finite() {
                return Err(FeatureError::NonFinite {
                    column: column.name(),
                    value: *value,
                });
            }
        }
        Ok(Self { schema, values })
    }

    /// Project the full feature set onto a schema
    pub fn project(features: &TripFeatures, schema: FeatureSchema) -> Result<Self, FeatureError> {
        let values = schema.columns().iter().map(|c| features.value(*c)).collect();
        Self::new(schema, values)
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: FeatureColumn) -> Option<f64> {
        self.schema
            .columns()
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i])
    }

    /// (name, value) pairs in schema order
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        self.schema
            .columns()
            .iter()
            .map(|c| c.name())
            .zip(self.values.iter().copied())
            .collect()
    }
}
