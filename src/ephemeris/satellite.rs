use sgp4::{Constants, Elements};
use thiserror::Error;

use super::horizon::{ecef_to_enu, Horizontal};
use crate::observer::Observer;

#[derive(Debug, Error)]
pub enum SatelliteError {
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("propagation error: {0}")]
    Propagation(String),
}

/// An SGP4-propagated satellite built from one two-line element set.
pub struct Satellite {
    name: String,
    elements: Elements,
    constants: Constants,
}

impl Satellite {
    pub fn from_tle(name: &str, line1: &str, line2: &str) -> Result<Self, SatelliteError> {
        let elements = Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            name: name.to_string(),
            elements,
            constants,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn position(&self, observer: &Observer) -> Result<Horizontal, SatelliteError> {
        let timestamp = observer.time.naive_utc();
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp)
            .map_err(|e| SatelliteError::Propagation(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| SatelliteError::Propagation(e.to_string()))?;

        let sat_ecef = teme_to_ecef(prediction.position, sidereal_rad(&timestamp));
        let sta_ecef = observer.position_ecef_km();

        let dr = [
            sat_ecef[0] - sta_ecef[0],
            sat_ecef[1] - sta_ecef[1],
            sat_ecef[2] - sta_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
        let elevation = if range_km > 0.0 {
            (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
        } else {
            0.0
        };

        Ok(Horizontal {
            altitude_deg: observer.reported_altitude(elevation),
            azimuth_deg: east.atan2(north).to_degrees().rem_euclid(360.0),
        })
    }
}

/// Earth rotation angle in radians, as the SGP4 TEME frame expects.
fn sidereal_rad(timestamp: &chrono::NaiveDateTime) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(timestamp))
}

fn teme_to_ecef(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let (sin_gmst, cos_gmst) = gmst.sin_cos();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}
