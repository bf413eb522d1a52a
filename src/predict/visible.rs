use chrono::{Duration, Timelike};

use crate::config::PassSearchConfig;
use crate::ephemeris::{position, CelestialBody, SatelliteError};
use crate::observer::{compass_point, Observer};
use crate::predict::error::PredictError;
use crate::predict::pass_finder::PassSource;
use crate::predict::types::{PassCandidate, SearchOutcome, VisiblePass};

pub trait SolarAltitude {
    fn solar_altitude_deg(&self, observer: &Observer) -> Result<f64, SatelliteError>;
}

/// The Sun as given by the mean-element ephemeris.
pub struct SunModel;

impl SolarAltitude for SunModel {
    fn solar_altitude_deg(&self, observer: &Observer) -> Result<f64, SatelliteError> {
        Ok(position(&CelestialBody::Sun, observer)?.altitude_deg)
    }
}

/// Walk successive passes from `start` until one is high enough and the sky
/// dark enough, or the attempt budget runs out. A propagation failure ends
/// the search as `Exhausted`.
pub fn search_visible_pass(
    passes: &dyn PassSource,
    sun: &dyn SolarAltitude,
    start: Observer,
    config: &PassSearchConfig,
    utc_offset_hours: i64,
) -> Result<SearchOutcome, PredictError> {
    let mut observer = start;

    for attempt in 1..=config.max_attempts {
        let candidate = match passes.next_pass(&observer) {
            Ok(Some(candidate)) => candidate,
            Ok(None) => {
                log::debug!("No rise within look-ahead after {}", observer.time);
                return Ok(SearchOutcome::Exhausted { attempts: attempt });
            }
            Err(e) => {
                log::warn!("Pass search stopped at {}: {}", observer.time, e);
                return Ok(SearchOutcome::Exhausted { attempts: attempt });
            }
        };

        let (rise, peak, set) = match candidate {
            PassCandidate {
                rise: Some(rise),
                culmination: Some(peak),
                set: Some(set),
            } => (rise, peak, set),
            _ => {
                observer = observer.at(observer.time + config.retry_step);
                continue;
            }
        };

        let advance = set.time + config.set_margin;

        if peak.altitude_deg <= config.min_peak_altitude_deg {
            log::debug!(
                "Attempt {}: pass at {} peaks at {:.1} deg, too low",
                attempt,
                rise.time,
                peak.altitude_deg
            );
            observer = observer.at(advance);
            continue;
        }

        let sun_alt = match sun.solar_altitude_deg(&observer.at(peak.time)) {
            Ok(alt) => alt,
            Err(e) => {
                log::warn!("Solar altitude at {} failed: {}", peak.time, e);
                return Ok(SearchOutcome::Exhausted { attempts: attempt });
            }
        };
        if sun_alt >= config.max_sun_altitude_deg {
            log::debug!(
                "Attempt {}: pass at {} has sun at {:.1} deg, too bright",
                attempt,
                rise.time,
                sun_alt
            );
            observer = observer.at(advance);
            continue;
        }

        let local_rise = rise.time + Duration::hours(utc_offset_hours);
        let duration_ms = (set.time - rise.time).num_milliseconds() as f64;
        return Ok(SearchOutcome::Found(VisiblePass {
            time: format!("{:02}:{:02}", local_rise.hour(), local_rise.minute()),
            date: local_rise.format("%d %b").to_string(),
            max_alt: peak.altitude_deg.round() as i64,
            rise_dir: compass_point(rise.azimuth_deg).to_string(),
            set_dir: compass_point(set.azimuth_deg).to_string(),
            duration_min: (duration_ms / 60_000.0).round() as i64,
        }));
    }

    Ok(SearchOutcome::Exhausted {
        attempts: config.max_attempts,
    })
}
