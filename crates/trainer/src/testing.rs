//! Synthetic labelled trips for tests

use crate::dataset::LabeledTrip;
use chrono::{Duration, NaiveDate};
use feature_engine::FeatureEngineer;
use trip_types::{StoreAndFwdFlag, TripRecord, VendorId};

/// Trips over the first months of 2016 whose duration is a noiseless
/// function of distance, rush hour and airport proximity
pub fn labeled_trips(n: usize) -> Vec<LabeledTrip> {
    let engineer = FeatureEngineer::default();
    let start = NaiveDate::from_ymd_opt(2016, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    (0..n)
        .map(|i| {
            let a = (i % 31) as f64 / 31.0;
            let b = (i % 13) as f64 / 13.0;
            let record = TripRecord {
                vendor_id: if i % 2 == 0 { VendorId::One } else { VendorId::Two },
                passenger_count: (i % 6) as u8 + 1,
                pickup_longitude: -74.00 + 0.06 * a,
                pickup_latitude: 40.71 + 0.07 * b,
                dropoff_longitude: -73.97 + 0.05 * b,
                dropoff_latitude: 40.74 + 0.04 * a,
                pickup_datetime: start + Duration::minutes(i as i64 * 113),
                store_and_fwd_flag: if i % 25 == 0 { StoreAndFwdFlag::Yes } else { StoreAndFwdFlag::No },
            };
            let features = engineer.engineer(&record);
            let seconds = 180.0
                + 150.0 * features.distance.distance
                + if features.flags.is_rush_hour { 300.0 } else { 0.0 };
            LabeledTrip {
                id: format!("id{i:07}"),
                record,
                trip_duration: seconds.round(),
            }
        })
        .collect()
}
