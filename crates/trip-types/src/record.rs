//! Trip Record Definitions

use crate::TripTypeError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Taxi vendor (the two TLC-licensed providers in the dataset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VendorId {
    One,
    Two,
}

impl VendorId {
    /// Numeric id as used in the dataset
    pub fn as_i64(&self) -> i64 {
        match self {
            VendorId::One => 1,
            VendorId::Two => 2,
        }
    }
}

impl TryFrom<i64> for VendorId {
    type Error = TripTypeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VendorId::One),
            2 => Ok(VendorId::Two),
            other => Err(TripTypeError::UnknownVendor(other)),
        }
    }
}

impl From<VendorId> for i64 {
    fn from(vendor: VendorId) -> Self {
        vendor.as_i64()
    }
}

/// Whether the trip was held in vehicle memory before being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreAndFwdFlag {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl StoreAndFwdFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreAndFwdFlag::Yes => "Y",
            StoreAndFwdFlag::No => "N",
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, StoreAndFwdFlag::Yes)
    }
}

impl FromStr for StoreAndFwdFlag {
    type Err = TripTypeError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Y" => Ok(StoreAndFwdFlag::Yes),
            "N" => Ok(StoreAndFwdFlag::No),
            _ => Err(TripTypeError::UnknownFlag(s.to_string())),
        }
    }
}

impl fmt::Display for StoreAndFwdFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Unchecked trip request as it arrives over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    pub vendor_id: i64,
    pub passenger_count: i64,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    /// `YYYY-MM-DD`
    pub pickup_date: String,
    /// `HH:MM`, 24-hour clock
    pub pickup_time: String,
    /// `Y` or `N`, case-insensitive
    pub store_and_fwd_flag: String,
}

impl TripInput {
    /// Midtown Manhattan trip used as the documented sample request
    pub fn sample() -> Self {
        Self {
            vendor_id: 1,
            passenger_count: 1,
            pickup_longitude: -73.988609,
            pickup_latitude: 40.748977,
            dropoff_longitude: -73.992797,
            dropoff_latitude: 40.763408,
            pickup_date: "2016-03-23".to_string(),
            pickup_time: "02:24".to_string(),
            store_and_fwd_flag: "N".to_string(),
        }
    }
}

/// Validated trip record consumed by the feature engineer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub vendor_id: VendorId,
    pub passenger_count: u8,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    /// Local pickup time, no timezone attached
    pub pickup_datetime: NaiveDateTime,
    pub store_and_fwd_flag: StoreAndFwdFlag,
}

impl TripRecord {
    pub fn pickup(&self) -> GeoPoint {
        GeoPoint {
            longitude: self.pickup_longitude,
            latitude: self.pickup_latitude,
        }
    }

    pub fn dropoff(&self) -> GeoPoint {
        GeoPoint {
            longitude: self.dropoff_longitude,
            latitude: self.dropoff_latitude,
        }
    }

    /// The four coordinates in dataset column order:
    /// pickup lon, pickup lat, dropoff lon, dropoff lat
    pub fn coordinates(&self) -> [f64; 4] {
        [
            self.pickup_longitude,
            self.pickup_latitude,
            self.dropoff_longitude,
            self.dropoff_latitude,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_roundtrip() {
        assert_eq!(VendorId::try_from(1), Ok(VendorId::One));
        assert_eq!(VendorId::try_from(2), Ok(VendorId::Two));
        assert_eq!(
            VendorId::try_from(3),
            Err(TripTypeError::UnknownVendor(3))
        );
    }

    #[test]
    fn test_flag_parsing_is_lenient() {
        assert_eq!(" y ".parse::<StoreAndFwdFlag>(), Ok(StoreAndFwdFlag::Yes));
        assert_eq!("n".parse::<StoreAndFwdFlag>(), Ok(StoreAndFwdFlag::No));
        assert!("yes".parse::<StoreAndFwdFlag>().is_err());
    }

    #[test]
    fn test_vendor_serializes_as_integer() {
        let json = serde_json::to_string(&VendorId::Two).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<VendorId>("7").is_err());
    }

    #[test]
    fn test_sample_input_json_shape() {
        let value = serde_json::to_value(TripInput::sample()).unwrap();
        assert_eq!(value["pickup_time"], "02:24");
        assert_eq!(value["vendor_id"], 1);
    }
}
