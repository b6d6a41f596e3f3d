//! Distance and Coordinate Statistics

use crate::config::FeatureConfig;
use serde::{Deserialize, Serialize};
use trip_types::GeoPoint;

/// Planar distance approximation between two points (km).
///
/// Projects the latitude/longitude difference onto a flat plane scaled by
/// the Earth radius, with the longitude term shrunk by `cos(dropoff lat)`.
/// Only meaningful over short spans such as a single city.
pub fn planar_distance(config: &FeatureConfig, pickup: GeoPoint, dropoff: GeoPoint) -> f64 {
    let lat1 = pickup.latitude.to_radians();
    let lat2 = dropoff.latitude.to_radians();
    let lon1 = pickup.longitude.to_radians();
    let lon2 = dropoff.longitude.to_radians();

    let x = config.earth_radius_km * (lat1 - lat2);
    let y = config.earth_radius_km * (lon1 - lon2) * lat2.cos();

    (x * x + y * y).sqrt()
}

/// Distance with its monotonic transforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceFeatures {
    pub distance: f64,
    pub distance_sqrt: f64,
    pub distance_square: f64,
    pub distance_cube: f64,
    pub log_distance: f64,
    pub log_distance_sqrt: f64,
    pub log_distance_square: f64,
    pub log_distance_cube: f64,
}

impl DistanceFeatures {
    pub fn from_distance(distance: f64) -> Self {
        let distance_sqrt = distance.sqrt();
        let distance_square = distance * distance;
        let distance_cube = distance_square * distance;
        Self {
            distance,
            distance_sqrt,
            distance_square,
            distance_cube,
            log_distance: distance.ln_1p(),
            log_distance_sqrt: distance_sqrt.ln_1p(),
            log_distance_square: distance_square.ln_1p(),
            log_distance_cube: distance_cube.ln_1p(),
        }
    }
}

/// Row-wise summary statistics over the four trip coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateStats {
    /// Mean of the signed coordinates
    pub arithmetic_mean: f64,
    /// Geometric mean of absolute values
    pub geometric_mean: f64,
    /// Harmonic mean of absolute values
    pub harmonic_mean: f64,
    /// Sum of squares
    pub square_sum: f64,
}

impl CoordinateStats {
    /// Compute statistics from a slice of coordinates.
    ///
    /// Geometric and harmonic means are 0 when any value is 0.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let arithmetic_mean = values.iter().sum::<f64>() / n;
        let square_sum = values.iter().map(|v| v * v).sum();

        let has_zero = values.iter().any(|v| *v == 0.0);
        let (geometric_mean, harmonic_mean) = if has_zero {
            (0.0, 0.0)
        } else {
            let log_mean = values.iter().map(|v| v.abs().ln()).sum::<f64>() / n;
            let reciprocal_sum = values.iter().map(|v| 1.0 / v.abs()).sum::<f64>();
            (log_mean.exp(), n / reciprocal_sum)
        };

        Self {
            arithmetic_mean,
            geometric_mean,
            harmonic_mean,
            square_sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_zero_distance() {
        let config = FeatureConfig::default();
        let p = GeoPoint { longitude: -73.98, latitude: 40.75 };
        assert_eq!(planar_distance(&config, p, p), 0.0);

        let features = DistanceFeatures::from_distance(0.0);
        assert_eq!(features, DistanceFeatures::default());
    }

    #[test]
    fn test_known_distance() {
        // One hundredth of a degree of latitude is ~1.109 km at R = 6356
        let config = FeatureConfig::default();
        let a = GeoPoint { longitude: -73.98, latitude: 40.75 };
        let b = GeoPoint { longitude: -73.98, latitude: 40.76 };
        let d = planar_distance(&config, a, b);
        assert!((d - 1.1093).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn test_distance_transforms() {
        let f = DistanceFeatures::from_distance(4.0);
        assert_eq!(f.distance_sqrt, 2.0);
        assert_eq!(f.distance_square, 16.0);
        assert_eq!(f.distance_cube, 64.0);
        assert!((f.log_distance - 5.0f64.ln()).abs() < 1e-12);
        assert!((f.log_distance_cube - 65.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_coordinate_means() {
        let stats = CoordinateStats::compute(&[-74.0, 40.0, -74.0, 40.0]);
        assert!((stats.arithmetic_mean - (-17.0)).abs() < 1e-12);
        assert!((stats.square_sum - 2.0 * (74.0 * 74.0 + 40.0 * 40.0)).abs() < 1e-9);
        // hmean(74, 40, 74, 40) = 4 / (2/74 + 2/40)
        let expected = 4.0 / (2.0 / 74.0 + 2.0 / 40.0);
        assert!((stats.harmonic_mean - expected).abs() < 1e-9);
        assert!((stats.geometric_mean - (74.0f64 * 40.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_values() {
        let stats = CoordinateStats::compute(&[]);
        assert_eq!(stats.arithmetic_mean, 0.0);
    }
}
