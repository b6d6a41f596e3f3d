//! Training-Set Cleaning
//!
//! Interquartile-range filtering on a numeric column plus coarse trip
//! sanity bounds. Used only when preparing training and evaluation data.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use trip_types::TripRecord;

/// IQR multiplier of the final training pipeline
pub const FINAL_IQR_MULTIPLIER: f64 = 1.5;

/// IQR multiplier of the looser baseline pipeline
pub const BASELINE_IQR_MULTIPLIER: f64 = 5.0;

/// Where the IQR span comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IqrSource {
    /// Compute from the rows being filtered
    Compute,
    /// Reuse a span recorded at training time
    Pinned(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierConfig {
    pub multiplier: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            multiplier: FINAL_IQR_MULTIPLIER,
        }
    }
}

/// Bounds applied by one filtering pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Quantile with linear interpolation between order statistics.
///
/// `sorted` must be ascending and free of NaN. Returns `None` when empty.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Compute quartile bounds for `values`.
///
/// Quartiles always come from `values`; only the span can be pinned.
/// Non-finite values are ignored. Returns `None` when no finite value is left.
pub fn iqr_bounds(values: &[f64], source: IqrSource, config: &OutlierConfig) -> Option<IqrBounds> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = match source {
        IqrSource::Compute => q3 - q1,
        IqrSource::Pinned(iqr) => iqr,
    };

    Some(IqrBounds {
        q1,
        q3,
        iqr,
        lower: q1 - config.multiplier * iqr,
        upper: q3 + config.multiplier * iqr,
    })
}

/// Keep rows whose key lies within the IQR bounds.
///
/// Returns the kept rows in their original order plus the bounds used, or
/// `None` for the bounds when `rows` is empty.
pub fn filter_by_iqr<T, F>(
    rows: Vec<T>,
    key: F,
    source: IqrSource,
    config: &OutlierConfig,
) -> (Vec<T>, Option<IqrBounds>)
where
    F: Fn(&T) -> f64,
{
    let values: Vec<f64> = rows.iter().map(&key).collect();
    let Some(bounds) = iqr_bounds(&values, source, config) else {
        return (Vec::new(), None);
    };

    let before = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .filter(|row| bounds.contains(key(row)))
        .collect();

    debug!(
        "IQR filter kept {}/{} rows (iqr={:.4}, bounds=[{:.4}, {:.4}])",
        kept.len(),
        before,
        bounds.iqr,
        bounds.lower,
        bounds.upper
    );

    (kept, Some(bounds))
}

/// Coarse plausibility bounds for raw training trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanityBounds {
    /// Passenger counts that never appear in a usable trip
    pub excluded_passenger_counts: Vec<u8>,
    pub latitude: (f64, f64),
    pub longitude: (f64, f64),
    /// Pickups inside this window are dropped (January 2016 blizzard)
    pub excluded_window: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Default for SanityBounds {
    fn default() -> Self {
        let midnight = |d: u32| {
            NaiveDate::from_ymd_opt(2016, 1, d).and_then(|date| date.and_hms_opt(0, 0, 0))
        };
        Self {
            excluded_passenger_counts: vec![0, 7],
            latitude: (40.0, 43.0),
            longitude: (-75.0, -73.0),
            excluded_window: midnight(22).zip(midnight(25)),
        }
    }
}

impl SanityBounds {
    pub fn accepts(&self, trip: &TripRecord) -> bool {
        if self
            .excluded_passenger_counts
            .contains(&trip.passenger_count)
        {
            return false;
        }

        let within = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        let coordinates_ok = within(trip.pickup_latitude, self.latitude)
            && within(trip.dropoff_latitude, self.latitude)
            && within(trip.pickup_longitude, self.longitude)
            && within(trip.dropoff_longitude, self.longitude);
        if !coordinates_ok {
            return false;
        }

        match self.excluded_window {
            Some((start, end)) => trip.pickup_datetime < start || trip.pickup_datetime > end,
            None => true,
        }
    }
}
