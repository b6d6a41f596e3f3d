//! Trip Feature Assembly

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::schema::{FeatureColumn, FeatureRow, FeatureSchema};
use crate::statistics::{planar_distance, CoordinateStats, DistanceFeatures};
use crate::temporal::{ContextFlags, TimeFeatures};
use serde::{Deserialize, Serialize};
use tracing::debug;
use trip_types::TripRecord;

/// Full engineered feature set for one trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripFeatures {
    pub vendor_id: i64,
    pub passenger_count: u8,
    /// Five or six passengers need a larger vehicle
    pub requires_large_vehicle: bool,

    pub distance: DistanceFeatures,
    pub is_jfk_airport: bool,
    pub is_lg_airport: bool,
    pub coordinates: CoordinateStats,

    pub time: TimeFeatures,
    pub flags: ContextFlags,
    pub store_and_forward: bool,

    /// `base_speed / 2^k`, k = number of slowing contexts
    pub virtual_speed: f64,
    /// Log distance over virtual speed
    pub virtual_time: f64,
    /// Square-root distance over virtual speed
    pub virtual_time_dist_sqrt: f64,
}

impl TripFeatures {
    pub fn is_airport(&self) -> bool {
        self.is_jfk_airport || self.is_lg_airport
    }

    pub fn virtual_speed_cube(&self) -> f64 {
        self.virtual_speed.powi(3)
    }

    pub fn virtual_time_cube(&self) -> f64 {
        self.virtual_time.powi(3)
    }

    /// Numeric value of a single column
    pub fn value(&self, column: FeatureColumn) -> f64 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match column {
            FeatureColumn::VendorId => self.vendor_id as f64,
            FeatureColumn::PassengerCount => f64::from(self.passenger_count),
            FeatureColumn::RequiresLargeVehicle => flag(self.requires_large_vehicle),
            FeatureColumn::TripDistance => self.distance.distance,
            FeatureColumn::TripDistanceSqrt => self.distance.distance_sqrt,
            FeatureColumn::TripDistanceSquare => self.distance.distance_square,
            FeatureColumn::TripDistanceCube => self.distance.distance_cube,
            FeatureColumn::LogTripDistance => self.distance.log_distance,
            FeatureColumn::LogTripDistanceSqrt => self.distance.log_distance_sqrt,
            FeatureColumn::LogTripDistanceSquare => self.distance.log_distance_square,
            FeatureColumn::LogTripDistanceCube => self.distance.log_distance_cube,
            FeatureColumn::IsJfkAirport => flag(self.is_jfk_airport),
            FeatureColumn::IsLgAirport => flag(self.is_lg_airport),
            FeatureColumn::CoordArithmeticMean => self.coordinates.arithmetic_mean,
            FeatureColumn::CoordGeometricMean => self.coordinates.geometric_mean,
            FeatureColumn::CoordHarmonicMean => self.coordinates.harmonic_mean,
            FeatureColumn::CoordSquareSum => self.coordinates.square_sum,
            FeatureColumn::Month => f64::from(self.time.month),
            FeatureColumn::Weekday => f64::from(self.time.weekday),
            FeatureColumn::Hour => f64::from(self.time.hour),
            FeatureColumn::Minute => f64::from(self.time.minute),
            FeatureColumn::DayOfYear => f64::from(self.time.day_of_year),
            FeatureColumn::Season => f64::from(self.time.season.code()),
            FeatureColumn::IsSummer => flag(self.flags.is_summer),
            FeatureColumn::IsRushHour => flag(self.flags.is_rush_hour),
            FeatureColumn::IsNight => flag(self.flags.is_night),
            FeatureColumn::IsWeekend => flag(self.flags.is_weekend),
            FeatureColumn::VirtualSpeed => self.virtual_speed,
            FeatureColumn::VirtualSpeedCube => self.virtual_speed_cube(),
            FeatureColumn::VirtualTime => self.virtual_time,
            FeatureColumn::VirtualTimeCube => self.virtual_time_cube(),
            FeatureColumn::VirtualTimeDistSqrt => self.virtual_time_dist_sqrt,
        }
    }

    /// Keep only the columns of `schema`, in its order
    pub fn project(&self, schema: FeatureSchema) -> Result<FeatureRow, FeatureError> {
        FeatureRow::project(self, schema)
    }
}

/// Deterministic trip -> features transformation
#[derive(Debug, Clone, Default)]
pub struct FeatureEngineer {
    config: FeatureConfig,
}

impl FeatureEngineer {
    /// Create a new feature engineer
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Compute every feature for a single trip
    pub fn engineer(&self, trip: &TripRecord) -> TripFeatures {
        let pickup = trip.pickup();
        let dropoff = trip.dropoff();

        let distance =
            DistanceFeatures::from_distance(planar_distance(&self.config, pickup, dropoff));

        let jfk = &self.config.jfk_airport;
        let laguardia = &self.config.laguardia_airport;
        let is_jfk_airport = jfk.contains(pickup) || jfk.contains(dropoff);
        let is_lg_airport = laguardia.contains(pickup) || laguardia.contains(dropoff);

        let coordinates = CoordinateStats::compute(&trip.coordinates());

        let time = TimeFeatures::from_datetime(&trip.pickup_datetime);
        let flags = ContextFlags::from_time(&time);
        let store_and_forward = trip.store_and_fwd_flag.is_stored();

        let slowdowns = [
            is_jfk_airport || is_lg_airport,
            flags.is_rush_hour,
            flags.is_summer,
            store_and_forward,
        ]
        .iter()
        .filter(|active| **active)
        .count() as i32;
        let virtual_speed = self.config.base_speed / 2f64.powi(slowdowns);

        let features = TripFeatures {
            vendor_id: trip.vendor_id.as_i64(),
            passenger_count: trip.passenger_count,
            requires_large_vehicle: matches!(trip.passenger_count, 5 | 6),
            distance,
            is_jfk_airport,
            is_lg_airport,
            coordinates,
            time,
            flags,
            store_and_forward,
            virtual_speed,
            virtual_time: distance.log_distance / virtual_speed,
            virtual_time_dist_sqrt: distance.distance_sqrt / virtual_speed,
        };

        debug!(
            "Engineered trip: distance={:.3}km virtual_speed={} airport={}",
            features.distance.distance,
            features.virtual_speed,
            features.is_airport()
        );

        features
    }

    /// Engineer a homogeneous batch, preserving order
    pub fn engineer_batch(&self, trips: &[TripRecord]) -> Vec<TripFeatures> {
        trips.iter().map(|t| self.engineer(t)).collect()
    }

    /// Engineer and project onto a schema in one step
    pub fn feature_row(
        &self,
        trip: &TripRecord,
        schema: FeatureSchema,
    ) -> Result<FeatureRow, FeatureError> {
        self.engineer(trip).project(schema)
    }

    pub fn feature_rows(
        &self,
        trips: &[TripRecord],
        schema: FeatureSchema,
    ) -> Result<Vec<FeatureRow>, FeatureError> {
        trips.iter().map(|t| self.feature_row(t, schema)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::Season;
    use chrono::NaiveDate;
    use trip_types::{StoreAndFwdFlag, VendorId};

    fn sample_trip() -> TripRecord {
        TripRecord {
            vendor_id: VendorId::One,
            passenger_count: 1,
            pickup_longitude: -73.988609,
            pickup_latitude: 40.748977,
            dropoff_longitude: -73.992797,
            dropoff_latitude: 40.763408,
            pickup_datetime: NaiveDate::from_ymd_opt(2016, 3, 23)
                .unwrap()
                .and_hms_opt(2, 24, 0)
                .unwrap(),
            store_and_fwd_flag: StoreAndFwdFlag::No,
        }
    }

    #[test]
    fn test_sample_trip_features() {
        let engineer = FeatureEngineer::default();
        let features = engineer.engineer(&sample_trip());

        assert!(features.flags.is_night);
        assert_eq!(features.time.season, Season::Spring);
        assert!(!features.flags.is_summer);
        assert!(features.distance.distance > 0.0);
        assert!(!features.is_airport());
        assert_eq!(features.virtual_speed, 32.0);
        assert!((features.virtual_time - features.distance.log_distance / 32.0).abs() < 1e-15);
    }

    #[test]
    fn test_identical_points_have_zero_distance() {
        let mut trip = sample_trip();
        trip.dropoff_longitude = trip.pickup_longitude;
        trip.dropoff_latitude = trip.pickup_latitude;

        let features = FeatureEngineer::default().engineer(&trip);
        for column in [
            FeatureColumn::TripDistance,
            FeatureColumn::TripDistanceSqrt,
            FeatureColumn::TripDistanceSquare,
            FeatureColumn::TripDistanceCube,
            FeatureColumn::LogTripDistance,
            FeatureColumn::LogTripDistanceSqrt,
            FeatureColumn::LogTripDistanceSquare,
            FeatureColumn::LogTripDistanceCube,
            FeatureColumn::VirtualTime,
            FeatureColumn::VirtualTimeDistSqrt,
        ] {
            assert_eq!(features.value(column), 0.0, "{column}");
        }
    }

    #[test]
    fn test_every_slowdown_halves_speed() {
        let engineer = FeatureEngineer::default();
        let mut trip = sample_trip();
        // JFK terminal pickup, summer, 08:00, stored and forwarded
        trip.pickup_longitude = -73.7781;
        trip.pickup_latitude = 40.6413;
        trip.pickup_datetime = NaiveDate::from_ymd_opt(2016, 7, 6)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        trip.store_and_fwd_flag = StoreAndFwdFlag::Yes;

        let features = engineer.engineer(&trip);
        assert!(features.is_jfk_airport);
        assert!(!features.is_lg_airport);
        assert!(features.flags.is_rush_hour);
        assert!(features.flags.is_summer);
        assert_eq!(features.virtual_speed, 2.0);
        assert_eq!(features.virtual_speed_cube(), 8.0);
    }

    #[test]
    fn test_dropoff_inside_laguardia() {
        let mut trip = sample_trip();
        trip.dropoff_longitude = -73.874;
        trip.dropoff_latitude = 40.7769;
        let features = FeatureEngineer::default().engineer(&trip);
        assert!(features.is_lg_airport);
        assert_eq!(features.virtual_speed, 16.0);
    }

    #[test]
    fn test_projection_follows_schema() {
        let engineer = FeatureEngineer::default();
        let row = engineer
            .feature_row(&sample_trip(), FeatureSchema::Inference)
            .unwrap();
        assert_eq!(row.values().len(), FeatureSchema::Inference.width());
        assert_eq!(row.get(FeatureColumn::Hour), Some(2.0));
        assert_eq!(row.get(FeatureColumn::Season), Some(1.0));
        assert_eq!(row.get(FeatureColumn::VirtualSpeed), None);

        let experiment = engineer
            .feature_row(&sample_trip(), FeatureSchema::Experiment)
            .unwrap();
        assert_eq!(experiment.get(FeatureColumn::VirtualSpeed), Some(32.0));
        assert_eq!(experiment.get(FeatureColumn::VirtualSpeedCube), Some(32768.0));
    }

    #[test]
    fn test_batch_matches_single() {
        let engineer = FeatureEngineer::default();
        let trips = vec![sample_trip(), sample_trip()];
        let batch = engineer.engineer_batch(&trips);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], engineer.engineer(&trips[0]));
    }

    #[test]
    fn test_config_is_injected() {
        let config = FeatureConfig {
            base_speed: 64.0,
            ..FeatureConfig::default()
        };
        let features = FeatureEngineer::new(config).engineer(&sample_trip());
        assert_eq!(features.virtual_speed, 64.0);
    }
}
