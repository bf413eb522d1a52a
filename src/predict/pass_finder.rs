use chrono::{DateTime, Duration, Utc};

use crate::ephemeris::search::{refine_crossing, refine_peak};
use crate::ephemeris::{position, CelestialBody, Satellite, SatelliteError};
use crate::observer::Observer;
use crate::predict::error::PredictError;
use crate::predict::types::{Culmination, HorizonEvent, PassCandidate};

const COARSE_STEP_SECONDS: i64 = 30;
const HORIZON_ELEVATION: f64 = 0.0;

/// Produces the next transit after an observer's time.
pub trait PassSource {
    /// `Ok(None)` when nothing rises within the source's look-ahead.
    fn next_pass(&self, observer: &Observer) -> Result<Option<PassCandidate>, PredictError>;
}

pub struct PassFinder<'a> {
    satellite: &'a Satellite,
    look_ahead: Duration,
}

impl<'a> PassFinder<'a> {
    pub fn new(satellite: &'a Satellite, look_ahead: Duration) -> Self {
        Self {
            satellite,
            look_ahead,
        }
    }

    fn altitude(&self, observer: &Observer, t: DateTime<Utc>) -> Result<f64, SatelliteError> {
        Ok(position(&self.body(), &observer.at(t))?.altitude_deg)
    }

    fn body(&self) -> CelestialBody<'a> {
        CelestialBody::Satellite(self.satellite)
    }

    fn horizon_event(
        &self,
        observer: &Observer,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
        rising: bool,
    ) -> Result<HorizonEvent, SatelliteError> {
        let time = refine_crossing(
            |t| self.altitude(observer, t),
            before,
            after,
            HORIZON_ELEVATION,
            rising,
        )?;
        let azimuth_deg = position(&self.body(), &observer.at(time))?.azimuth_deg;
        Ok(HorizonEvent { time, azimuth_deg })
    }
}

impl PassSource for PassFinder<'_> {
    fn next_pass(&self, observer: &Observer) -> Result<Option<PassCandidate>, PredictError> {
        let step = Duration::seconds(COARSE_STEP_SECONDS);
        let start = observer.time;
        let end = start + self.look_ahead;

        let start_alt = self.altitude(observer, start)?;
        // Already up: the rise happened before the window, so it stays unknown.
        let mut in_pass = start_alt >= HORIZON_ELEVATION;
        let mut rise: Option<HorizonEvent> = None;
        let mut pass_start = start;
        let mut max_el = start_alt;
        let mut max_el_time = start;
        let mut prev = start;
        let mut cursor = start;

        while cursor < end {
            cursor += step;
            let elevation = self.altitude(observer, cursor)?;
            let visible = elevation >= HORIZON_ELEVATION;

            if visible && !in_pass {
                let event = self.horizon_event(observer, prev, cursor, true)?;
                pass_start = event.time;
                rise = Some(event);
                in_pass = true;
                max_el = elevation;
                max_el_time = cursor;
            } else if visible {
                if elevation > max_el {
                    max_el = elevation;
                    max_el_time = cursor;
                }
            } else if in_pass {
                let set = self.horizon_event(observer, prev, cursor, false)?;
                let low = (max_el_time - step).max(pass_start);
                let high = (max_el_time + step).min(set.time);
                let (time, altitude_deg) =
                    refine_peak(|t| self.altitude(observer, t), low, high)?;
                log::debug!(
                    "{} candidate pass peaking at {:.1} deg at {}",
                    self.satellite.name(),
                    altitude_deg,
                    time
                );
                return Ok(Some(PassCandidate {
                    rise,
                    culmination: Some(Culmination { time, altitude_deg }),
                    set: Some(set),
                }));
            }

            prev = cursor;
        }

        if in_pass {
            // Still up when the window closed.
            return Ok(Some(PassCandidate {
                rise,
                ..PassCandidate::default()
            }));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::satellite_fixtures::{ISS_LINE1, ISS_LINE2, ISS_NAME};
    use crate::observer::Site;
    use chrono::TimeZone;

    fn iss() -> Satellite {
        Satellite::from_tle(ISS_NAME, ISS_LINE1, ISS_LINE2).unwrap()
    }

    fn observer() -> Observer {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Observer::new(&Site::default(), Some(t))
    }

    #[test]
    fn finds_an_ordered_pass_within_a_day() {
        let sat = iss();
        let finder = PassFinder::new(&sat, Duration::hours(24));
        let mut obs = observer();

        // Skip a possibly in-progress pass at the window start.
        let candidate = loop {
            let c = finder.next_pass(&obs).unwrap().expect("ISS rises within a day");
            if c.rise.is_some() {
                break c;
            }
            obs = obs.at(c.set.unwrap().time + Duration::minutes(1));
        };

        let rise = candidate.rise.unwrap();
        let peak = candidate.culmination.unwrap();
        let set = candidate.set.unwrap();
        assert!(rise.time >= obs.time);
        assert!(rise.time <= peak.time && peak.time <= set.time);
        assert!(peak.altitude_deg > 0.0 && peak.altitude_deg <= 90.0);
        assert!(set.time > rise.time);
        let minutes = (set.time - rise.time).num_minutes();
        assert!(minutes <= 15, "pass lasted {minutes} min");

        // Horizon crossings are within a fraction of a degree of zero.
        let at_rise = sat.position(&obs.at(rise.time)).unwrap().altitude_deg;
        assert!(at_rise.abs() < 0.2, "altitude at rise {at_rise}");
    }

    #[test]
    fn tiny_window_without_a_rise_yields_nothing() {
        let sat = iss();
        let finder = PassFinder::new(&sat, Duration::zero());
        let obs = observer();
        let start_up = sat.position(&obs).unwrap().altitude_deg >= 0.0;
        let result = finder.next_pass(&obs).unwrap();
        if start_up {
            let c = result.unwrap();
            assert!(c.rise.is_none() && c.set.is_none());
        } else {
            assert!(result.is_none());
        }
    }
}
