use chrono::{DateTime, Utc};

pub const J2000_JD: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const MS_PER_DAY: f64 = 86_400_000.0;

pub fn julian_date(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / MS_PER_DAY + UNIX_EPOCH_JD
}

/// Days since 2000 Jan 0.0 UT, the argument of the mean-element polynomials.
pub fn day_number(t: DateTime<Utc>) -> f64 {
    julian_date(t) - 2_451_543.5
}

/// Greenwich mean sidereal time in degrees, IAU 1982.
pub fn gmst_deg(t: DateTime<Utc>) -> f64 {
    let d = julian_date(t) - J2000_JD;
    let c = d / 36_525.0;
    (280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * c * c - c * c * c / 38_710_000.0)
        .rem_euclid(360.0)
}

pub fn local_sidereal_deg(t: DateTime<Utc>, longitude_deg: f64) -> f64 {
    (gmst_deg(t) + longitude_deg).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn j2000_epoch() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_date(t) - J2000_JD).abs() < 1e-9);
        assert!((day_number(t) - 1.5).abs() < 1e-9);
        assert!((gmst_deg(t) - 280.460_618_37).abs() < 1e-6);
    }

    #[test]
    fn sidereal_day_is_shorter_than_solar_day() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let t1 = t0 + chrono::Duration::days(1);
        let advance = (gmst_deg(t1) - gmst_deg(t0)).rem_euclid(360.0);
        assert!((advance - 0.9856).abs() < 0.001, "advance {advance}");
    }

    #[test]
    fn local_sidereal_wraps() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let lst = local_sidereal_deg(t, 100.0);
        assert!((lst - 20.460_618_37).abs() < 1e-6);
    }
}
