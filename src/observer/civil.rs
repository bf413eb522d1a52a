use chrono::{DateTime, Datelike, Utc};

/// Hours between UTC and UK clock time.
///
/// Calendar approximation of the BST rule: summer months are shifted, and the
/// March/October transitions are taken as the 25th rather than the last Sunday.
pub fn civil_offset_hours(now: DateTime<Utc>) -> i64 {
    match (now.month(), now.day()) {
        (4..=9, _) => 1,
        (3, day) if day >= 25 => 1,
        (10, day) if day < 25 => 1,
        _ => 0,
    }
}

/// Format fractional hours as `HH:MM`, wrapping into one day. Minutes truncate.
pub fn format_hhmm(hours: f64) -> String {
    let h = hours.rem_euclid(24.0);
    let whole = h.trunc();
    let minutes = ((h - whole) * 60.0).trunc();
    format!("{:02}:{:02}", whole as u32 % 24, minutes as u32 % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn offset_follows_calendar_heuristic() {
        assert_eq!(civil_offset_hours(at(1, 15)), 0);
        assert_eq!(civil_offset_hours(at(3, 24)), 0);
        assert_eq!(civil_offset_hours(at(3, 25)), 1);
        assert_eq!(civil_offset_hours(at(4, 1)), 1);
        assert_eq!(civil_offset_hours(at(9, 30)), 1);
        assert_eq!(civil_offset_hours(at(10, 24)), 1);
        assert_eq!(civil_offset_hours(at(10, 25)), 0);
        assert_eq!(civil_offset_hours(at(12, 31)), 0);
    }

    #[test]
    fn hhmm_wraps_and_truncates() {
        assert_eq!(format_hhmm(6.5), "06:30");
        assert_eq!(format_hhmm(25.25), "01:15");
        assert_eq!(format_hhmm(-0.5), "23:30");
        assert_eq!(format_hhmm(7.999), "07:59");
        assert_eq!(format_hhmm(24.0), "00:00");
    }
}
