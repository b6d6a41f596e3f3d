//! Trip Request Validator

use crate::error::ValidationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;
use trip_types::{StoreAndFwdFlag, TripInput, TripRecord, VendorId};

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("time pattern is valid")
});

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Passenger count, inclusive
    pub passenger_range: (i64, i64),
    /// Longitude bounds, exclusive (degrees)
    pub longitude_range: (f64, f64),
    /// Latitude bounds, exclusive (degrees)
    pub latitude_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            passenger_range: (1, 6),
            longitude_range: (-75.0, -73.0),
            latitude_range: (40.0, 43.0),
        }
    }
}

/// Every field that failed validation for one request
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Field name -> human readable message
    pub fn field_messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|e| (e.field().to_string(), e.to_string()))
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }
}

/// Validator for incoming trip requests
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a coordinate against an open interval. NaN never passes.
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<f64, ValidationError> {
        if value > range.0 && value < range.1 {
            Ok(value)
        } else {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        }
    }

    pub fn validate_longitude(&self, field: &'static str, value: f64) -> Result<f64, ValidationError> {
        self.validate_range(field, value, self.config.longitude_range)
    }

    pub fn validate_latitude(&self, field: &'static str, value: f64) -> Result<f64, ValidationError> {
        self.validate_range(field, value, self.config.latitude_range)
    }

    pub fn validate_vendor(&self, vendor_id: i64) -> Result<VendorId, ValidationError> {
        VendorId::try_from(vendor_id).map_err(|_| ValidationError::UnknownVendor(vendor_id))
    }

    pub fn validate_passenger_count(&self, count: i64) -> Result<u8, ValidationError> {
        let (min, max) = self.config.passenger_range;
        if count < min || count > max {
            return Err(ValidationError::PassengerCount { value: count, min, max });
        }
        u8::try_from(count).map_err(|_| ValidationError::PassengerCount { value: count, min, max })
    }

    pub fn validate_flag(&self, flag: &str) -> Result<StoreAndFwdFlag, ValidationError> {
        flag.parse::<StoreAndFwdFlag>()
            .map_err(|_| ValidationError::InvalidFlag(flag.to_string()))
    }

    /// `YYYY-MM-DD` that also exists on the calendar
    pub fn validate_date(&self, date: &str) -> Result<NaiveDate, ValidationError> {
        if !DATE_PATTERN.is_match(date) {
            return Err(ValidationError::InvalidFormat {
                field: "pickup_date",
                value: date.to_string(),
                expected: "YYYY-MM-DD",
            });
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
            field: "pickup_date",
            value: date.to_string(),
        })
    }

    /// `HH:MM` on a 24-hour clock
    pub fn validate_time(&self, time: &str) -> Result<NaiveTime, ValidationError> {
        let format_error = || ValidationError::InvalidFormat {
            field: "pickup_time",
            value: time.to_string(),
            expected: "HH:MM (24-hour clock)",
        };
        if !TIME_PATTERN.is_match(time) {
            return Err(format_error());
        }
        NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| format_error())
    }

    /// Validate every field of a request, collecting all failures
    pub fn validate(&self, input: &TripInput) -> Result<TripRecord, ValidationReport> {
        let mut errors = Vec::new();

        let flag = self.validate_flag(&input.store_and_fwd_flag);
        let vendor = self.validate_vendor(input.vendor_id);
        let passengers = self.validate_passenger_count(input.passenger_count);
        let pickup_lon = self.validate_longitude("pickup_longitude", input.pickup_longitude);
        let pickup_lat = self.validate_latitude("pickup_latitude", input.pickup_latitude);
        let dropoff_lon = self.validate_longitude("dropoff_longitude", input.dropoff_longitude);
        let dropoff_lat = self.validate_latitude("dropoff_latitude", input.dropoff_latitude);
        let date = self.validate_date(&input.pickup_date);
        let time = self.validate_time(&input.pickup_time);

        macro_rules! take {
            ($result:expr) => {
                match $result {
                    Ok(v) => Some(v),
                    Err(e) => {
                        errors.push(e);
                        None
                    }
                }
            };
        }

        let flag = take!(flag);
        let vendor = take!(vendor);
        let passengers = take!(passengers);
        let pickup_lon = take!(pickup_lon);
        let pickup_lat = take!(pickup_lat);
        let dropoff_lon = take!(dropoff_lon);
        let dropoff_lat = take!(dropoff_lat);
        let date = take!(date);
        let time = take!(time);

        match (
            flag, vendor, passengers, pickup_lon, pickup_lat, dropoff_lon, dropoff_lat, date, time,
        ) {
            (
                Some(store_and_fwd_flag),
                Some(vendor_id),
                Some(passenger_count),
                Some(pickup_longitude),
                Some(pickup_latitude),
                Some(dropoff_longitude),
                Some(dropoff_latitude),
                Some(date),
                Some(time),
            ) => Ok(TripRecord {
                vendor_id,
                passenger_count,
                pickup_longitude,
                pickup_latitude,
                dropoff_longitude,
                dropoff_latitude,
                pickup_datetime: NaiveDateTime::new(date, time),
                store_and_fwd_flag,
            }),
            _ => {
                debug!("Trip request rejected: {} invalid field(s)", errors.len());
                Err(ValidationReport { errors })
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_in_box_coordinates_accepted(
            lon in -74.999f64..-73.001,
            lat in 40.001f64..42.999,
        ) {
            let validator = Validator::default();
            let input = TripInput {
                pickup_longitude: lon,
                pickup_latitude: lat,
                dropoff_longitude: lon,
                dropoff_latitude: lat,
                ..TripInput::sample()
            };
            prop_assert!(validator.validate(&input).is_ok());
        }

        #[test]
        fn prop_out_of_box_latitude_rejected(lat in prop_oneof![0.0f64..40.0, 43.0f64..90.0]) {
            let validator = Validator::default();
            let input = TripInput { pickup_latitude: lat, ..TripInput::sample() };
            let report = validator.validate(&input).unwrap_err();
            prop_assert!(report.has_field("pickup_latitude"));
        }
    }
}
