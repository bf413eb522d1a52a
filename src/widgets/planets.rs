use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::PlanetConfig;
use crate::ephemeris::search::{next_setting, Setting};
use crate::ephemeris::{position, CelestialBody, Planet, SatelliteError};
use crate::observer::{compass_point, Observer};

/// Upper limb of the Sun touching the geometric horizon.
const SUNSET_ALTITUDE_DEG: f64 = -0.2667;
const SUNSET_WINDOW_HOURS: i64 = 36;
const SUNSET_STEP_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisiblePlanet {
    pub name: String,
    pub dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanetReport {
    pub planets: Vec<VisiblePlanet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// When to look: the configured delay after the next sunset. `None` if the
/// Sun stays up for the whole search window.
pub fn viewing_time(
    observer: &Observer,
    config: &PlanetConfig,
) -> Result<Option<DateTime<Utc>>, SatelliteError> {
    let setting = next_setting(
        |t| position(&CelestialBody::Sun, &observer.at(t)).map(|h| h.altitude_deg),
        observer.time,
        Duration::hours(SUNSET_WINDOW_HOURS),
        Duration::minutes(SUNSET_STEP_MINUTES),
        SUNSET_ALTITUDE_DEG,
    )?;

    Ok(match setting {
        Setting::At(sunset) => Some(sunset + config.viewing_delay),
        Setting::AlwaysUp => None,
        // Polar night: it is already dark.
        Setting::NeverUp => Some(observer.time),
    })
}

/// Naked-eye planets above the configured altitude at the next viewing time.
pub fn visible_planets(
    observer: &Observer,
    config: &PlanetConfig,
) -> Result<PlanetReport, SatelliteError> {
    let Some(view_time) = viewing_time(observer, config)? else {
        log::debug!("Sun does not set within {} h", SUNSET_WINDOW_HOURS);
        return Ok(PlanetReport {
            planets: Vec::new(),
            note: Some("No darkness".to_string()),
        });
    };

    let at_view = observer.at(view_time);
    let mut planets = Vec::new();
    for planet in Planet::ALL {
        let h = position(&CelestialBody::Planet(planet), &at_view)?;
        if h.altitude_deg > config.min_altitude_deg {
            planets.push(VisiblePlanet {
                name: planet.to_string(),
                dir: compass_point(h.azimuth_deg).to_string(),
            });
        }
    }

    Ok(PlanetReport {
        planets,
        note: None,
    })
}
