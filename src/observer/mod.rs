mod civil;
mod compass;

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub use civil::{civil_offset_hours, format_hhmm};
pub use compass::compass_point;

/// Fixed ground location, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
    /// Apply atmospheric refraction to reported altitudes.
    pub refraction: bool,
}

impl Default for Site {
    // London
    fn default() -> Self {
        Self {
            latitude_deg: 51.5074,
            longitude_deg: -0.1278,
            elevation_m: 11.0,
            refraction: false,
        }
    }
}

/// A site pinned to an instant. Never mutated; use [`Observer::at`] to move in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
    pub refraction_disabled: bool,
    pub time: DateTime<Utc>,
}

impl Observer {
    pub fn new(site: &Site, time: Option<DateTime<Utc>>) -> Self {
        Self {
            latitude_deg: site.latitude_deg,
            longitude_deg: site.longitude_deg,
            elevation_m: site.elevation_m,
            refraction_disabled: !site.refraction,
            time: time.unwrap_or_else(Utc::now),
        }
    }

    pub fn at(&self, time: DateTime<Utc>) -> Self {
        Self { time, ..*self }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 constants
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let (sin_lat, cos_lat) = self.lat_rad().sin_cos();
        let (sin_lon, cos_lon) = self.lon_rad().sin_cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.elevation_m / 1000.0;
        [
            (n + alt_km) * cos_lat * cos_lon,
            (n + alt_km) * cos_lat * sin_lon,
            (n * (1.0 - e2) + alt_km) * sin_lat,
        ]
    }

    /// Geometric altitude as the observer would report it.
    pub fn reported_altitude(&self, geometric_deg: f64) -> f64 {
        if self.refraction_disabled || geometric_deg < -1.0 {
            return geometric_deg;
        }
        // Bennett (1982), arcminutes
        let r = 1.0 / (geometric_deg + 7.31 / (geometric_deg + 4.4)).to_radians().tan();
        geometric_deg + r / 60.0
    }
}
