use chrono::Datelike;
use serde::Serialize;

use crate::observer::{civil_offset_hours, format_hhmm, Observer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
}

/// Approximate sunrise and sunset on the observer's day, in local clock time.
///
/// Uses the cosine declination model and ignores refraction and the solar
/// disc. Polar day and night clamp the hour angle instead of failing, giving
/// a 24 h or 0 h span around solar noon.
pub fn sun_times(observer: &Observer) -> SunTimes {
    let n = observer.time.ordinal() as f64;
    let decl = (-23.44 * (360.0 / 365.0 * (n + 10.0)).to_radians().cos()).to_radians();
    let cos_ha = (-observer.lat_rad().tan() * decl.tan()).clamp(-1.0, 1.0);
    let ha = cos_ha.acos().to_degrees();

    let solar_noon = 12.0 - observer.longitude_deg / 15.0;
    let offset = civil_offset_hours(observer.time) as f64;

    SunTimes {
        sunrise: format_hhmm(solar_noon - ha / 15.0 + offset),
        sunset: format_hhmm(solar_noon + ha / 15.0 + offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Site;
    use chrono::{Duration, TimeZone, Utc};

    fn well_formed(s: &str) -> bool {
        let b = s.as_bytes();
        b.len() == 5
            && b[2] == b':'
            && s[..2].parse::<u32>().is_ok_and(|h| h < 24)
            && s[3..].parse::<u32>().is_ok_and(|m| m < 60)
    }

    #[test]
    fn every_day_of_a_leap_year_is_well_formed() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        for site in [
            Site::default(),
            Site {
                latitude_deg: 78.2,
                longitude_deg: 15.6,
                ..Site::default()
            },
            Site {
                latitude_deg: -89.9,
                ..Site::default()
            },
        ] {
            for day in 0..366 {
                let obs = Observer::new(&site, Some(start + Duration::days(day)));
                let times = sun_times(&obs);
                assert!(well_formed(&times.sunrise), "{times:?} on day {day}");
                assert!(well_formed(&times.sunset), "{times:?} on day {day}");
            }
        }
    }

    #[test]
    fn london_winter_and_summer() {
        let winter = Observer::new(
            &Site::default(),
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()),
        );
        let times = sun_times(&winter);
        assert!(times.sunrise.starts_with("07:") || times.sunrise.starts_with("08:"));
        assert!(times.sunset.starts_with("15:") || times.sunset.starts_with("16:"));

        // BST: clock is an hour ahead of the solar estimate.
        let summer = Observer::new(
            &Site::default(),
            Some(Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap()),
        );
        let times = sun_times(&summer);
        assert!(times.sunrise.starts_with("04:"), "{times:?}");
        assert!(times.sunset.starts_with("21:"), "{times:?}");
    }

    #[test]
    fn polar_day_clamps_to_full_span() {
        let obs = Observer::new(
            &Site {
                latitude_deg: 80.0,
                longitude_deg: 0.0,
                ..Site::default()
            },
            Some(Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap()),
        );
        let times = sun_times(&obs);
        // noon 12:00 + 1 h offset, half-span 12 h
        assert_eq!(times.sunrise, "01:00");
        assert_eq!(times.sunset, "01:00");
    }
}
