//! Self-contained positional astronomy for one ground observer.
//!
//! The Sun and planets come from a mean-element Keplerian model, satellites
//! from SGP4. All of them expose altitude/azimuth for an [`Observer`] through
//! [`position`].

mod horizon;
mod orbits;
mod satellite;
pub mod search;
mod time;

use crate::observer::Observer;

pub use horizon::Horizontal;
pub use orbits::Planet;
pub use satellite::{Satellite, SatelliteError};

#[cfg(test)]
pub(crate) use satellite::tests as satellite_fixtures;

/// Anything the dashboard can point at.
#[derive(Clone, Copy)]
pub enum CelestialBody<'a> {
    Sun,
    Planet(Planet),
    Satellite(&'a Satellite),
}

impl CelestialBody<'_> {
    pub fn position(&self, observer: &Observer) -> Result<Horizontal, SatelliteError> {
        match self {
            CelestialBody::Sun => Ok(orbital(orbits::sun_ecliptic, observer)),
            CelestialBody::Planet(planet) => {
                Ok(orbital(|d| orbits::planet_ecliptic(*planet, d), observer))
            }
            CelestialBody::Satellite(sat) => sat.position(observer),
        }
    }
}

fn orbital(ecliptic: impl Fn(f64) -> [f64; 3], observer: &Observer) -> Horizontal {
    let d = time::day_number(observer.time);
    let mut h = horizon::to_horizontal(&orbits::to_equatorial(ecliptic(d), d), observer);
    h.altitude_deg = observer.reported_altitude(h.altitude_deg);
    h
}

pub fn position(body: &CelestialBody<'_>, observer: &Observer) -> Result<Horizontal, SatelliteError> {
    body.position(observer)
}
