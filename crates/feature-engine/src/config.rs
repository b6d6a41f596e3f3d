//! Feature Engineering Constants

use serde::{Deserialize, Serialize};
use trip_types::GeoPoint;

/// Axis-aligned box in degrees, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    pub latitude: (f64, f64),
    pub longitude: (f64, f64),
}

impl GeoBox {
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude >= self.latitude.0
            && point.latitude <= self.latitude.1
            && point.longitude >= self.longitude.0
            && point.longitude <= self.longitude.1
    }
}

/// Physical constants injected into the feature engineer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Earth radius used by the planar distance approximation (km)
    pub earth_radius_km: f64,
    /// JFK airport bounding box
    pub jfk_airport: GeoBox,
    /// LaGuardia airport bounding box
    pub laguardia_airport: GeoBox,
    /// Virtual speed with no slowing context active
    pub base_speed: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: 6356.0,
            jfk_airport: GeoBox {
                latitude: (40.620998, 40.683139),
                longitude: (-73.841476, -73.729188),
            },
            laguardia_airport: GeoBox {
                latitude: (40.763557, 40.787499),
                longitude: (-73.899899, -73.848085),
            },
            base_speed: 32.0,
        }
    }
}
