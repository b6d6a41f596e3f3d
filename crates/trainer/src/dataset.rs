//! CSV Trip Datasets
//!
//! Reads labelled trips in the public NYC taxi trip duration layout:
//! `id, vendor_id, pickup_datetime, dropoff_datetime, passenger_count,
//! pickup_longitude, pickup_latitude, dropoff_longitude, dropoff_latitude,
//! store_and_fwd_flag, trip_duration`.

use crate::TrainerError;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;
use trip_types::{StoreAndFwdFlag, TripRecord, VendorId};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One CSV row as written on disk
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrip {
    pub id: String,
    pub vendor_id: i64,
    pub pickup_datetime: String,
    #[serde(default)]
    pub dropoff_datetime: Option<String>,
    pub passenger_count: i64,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    pub store_and_fwd_flag: String,
    pub trip_duration: f64,
}

/// A typed trip with its observed duration in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTrip {
    pub id: String,
    pub record: TripRecord,
    pub trip_duration: f64,
}

impl LabeledTrip {
    /// `log1p(trip_duration)`, the regression target
    pub fn log_duration(&self) -> f64 {
        self.trip_duration.ln_1p()
    }
}

impl TryFrom<RawTrip> for LabeledTrip {
    type Error = String;

    fn try_from(raw: RawTrip) -> Result<Self, Self::Error> {
        let pickup_datetime = NaiveDateTime::parse_from_str(raw.pickup_datetime.trim(), DATETIME_FORMAT)
            .map_err(|e| format!("pickup_datetime {:?}: {}", raw.pickup_datetime, e))?;
        let vendor_id = VendorId::try_from(raw.vendor_id).map_err(|e| e.to_string())?;
        let passenger_count = u8::try_from(raw.passenger_count)
            .map_err(|_| format!("passenger_count {} out of range", raw.passenger_count))?;
        let store_and_fwd_flag = raw
            .store_and_fwd_flag
            .parse::<StoreAndFwdFlag>()
            .map_err(|e| e.to_string())?;
        if !raw.trip_duration.is_finite() || raw.trip_duration < 0.0 {
            return Err(format!("trip_duration {} is not a duration", raw.trip_duration));
        }

        Ok(Self {
            id: raw.id,
            record: TripRecord {
                vendor_id,
                passenger_count,
                pickup_longitude: raw.pickup_longitude,
                pickup_latitude: raw.pickup_latitude,
                dropoff_longitude: raw.dropoff_longitude,
                dropoff_latitude: raw.dropoff_latitude,
                pickup_datetime,
                store_and_fwd_flag,
            },
            trip_duration: raw.trip_duration,
        })
    }
}

/// Read labelled trips from any CSV source with a header row
pub fn read_trips<R: Read>(reader: R) -> Result<Vec<LabeledTrip>, TrainerError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut trips = Vec::new();
    for (index, result) in csv_reader.deserialize::<RawTrip>().enumerate() {
        let raw = result?;
        let trip = LabeledTrip::try_from(raw).map_err(|reason| TrainerError::InvalidRow {
            // header is line 1
            line: index as u64 + 2,
            reason,
        })?;
        trips.push(trip);
    }
    Ok(trips)
}

pub fn load_trips(path: impl AsRef<Path>) -> Result<Vec<LabeledTrip>, TrainerError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| TrainerError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let trips = read_trips(file)?;
    info!("Loaded {} trips from {}", trips.len(), path.display());
    Ok(trips)
}

/// Concatenate several CSV files in order
pub fn load_many<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<LabeledTrip>, TrainerError> {
    let mut all = Vec::new();
    for path in paths {
        all.extend(load_trips(path)?);
    }
    Ok(all)
}
