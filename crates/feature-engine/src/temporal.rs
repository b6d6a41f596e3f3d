//! Calendar and Time-of-Day Features

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Meteorological season by quarter of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter = 0,
    Spring = 1,
    Summer = 2,
    Fall = 3,
}

impl Season {
    /// December through February is winter; anything outside the first
    /// three quarters falls through to fall.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Fields derived from the pickup timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeFeatures {
    pub month: u32,
    /// Monday = 0
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub day_of_year: u32,
    pub season: Season,
}

impl TimeFeatures {
    pub fn from_datetime(pickup: &NaiveDateTime) -> Self {
        let month = pickup.month();
        Self {
            month,
            weekday: pickup.weekday().num_days_from_monday(),
            hour: pickup.hour(),
            minute: pickup.minute(),
            day_of_year: pickup.ordinal(),
            season: Season::from_month(month),
        }
    }
}

/// Binary context flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFlags {
    pub is_summer: bool,
    pub is_rush_hour: bool,
    pub is_night: bool,
    pub is_weekend: bool,
}

impl ContextFlags {
    pub fn from_time(time: &TimeFeatures) -> Self {
        Self {
            is_summer: time.season == Season::Summer,
            is_rush_hour: is_rush_hour(time.hour),
            is_night: is_night(time.hour),
            is_weekend: time.weekday >= 5,
        }
    }
}

/// Morning 07-09 and the long afternoon 13-19, both inclusive
pub fn is_rush_hour(hour: u32) -> bool {
    (7..=9).contains(&hour) || (13..=19).contains(&hour)
}

/// Strictly between 01 and 06; midnight and 01 are not night.
pub fn is_night(hour: u32) -> bool {
    hour > 1 && hour < 6
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_season_mapping() {
        let expected = [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 0];
        for (i, code) in expected.iter().enumerate() {
            assert_eq!(Season::from_month(i as u32 + 1).code(), *code, "month {}", i + 1);
        }
    }

    #[test]
    fn test_night_boundaries() {
        assert!(!is_night(0));
        assert!(!is_night(1));
        assert!(is_night(2));
        assert!(is_night(5));
        assert!(!is_night(6));
        assert!(!is_night(23));
    }

    #[test]
    fn test_rush_hour_boundaries() {
        assert!(!is_rush_hour(6));
        assert!(is_rush_hour(7));
        assert!(is_rush_hour(9));
        assert!(!is_rush_hour(10));
        assert!(!is_rush_hour(12));
        assert!(is_rush_hour(13));
        assert!(is_rush_hour(19));
        assert!(!is_rush_hour(20));
    }

    #[test]
    fn test_time_features_from_sample() {
        // 2016-03-23 was a Wednesday
        let time = TimeFeatures::from_datetime(&at(2016, 3, 23, 2, 24));
        assert_eq!(time.month, 3);
        assert_eq!(time.weekday, 2);
        assert_eq!(time.hour, 2);
        assert_eq!(time.minute, 24);
        assert_eq!(time.day_of_year, 83);
        assert_eq!(time.season, Season::Spring);

        let flags = ContextFlags::from_time(&time);
        assert!(flags.is_night);
        assert!(!flags.is_summer);
        assert!(!flags.is_rush_hour);
        assert!(!flags.is_weekend);
    }

    #[test]
    fn test_weekend() {
        // 2016-07-02 was a Saturday
        let time = TimeFeatures::from_datetime(&at(2016, 7, 2, 14, 0));
        let flags = ContextFlags::from_time(&time);
        assert!(flags.is_weekend);
        assert!(flags.is_summer);
        assert!(flags.is_rush_hour);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_every_month_has_a_season(month in 1u32..=12) {
            let code = Season::from_month(month).code();
            prop_assert!(code <= 3);
        }

        #[test]
        fn prop_night_iff_between_one_and_six(hour in 0u32..24) {
            prop_assert_eq!(is_night(hour), (2..=5).contains(&hour));
        }
    }
}
