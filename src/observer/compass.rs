const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Eight-point compass name for an azimuth in degrees. Ties go to the even index.
pub fn compass_point(azimuth_deg: f64) -> &'static str {
    let sector = (azimuth_deg / 45.0).round_ties_even();
    if !sector.is_finite() {
        return POINTS[0];
    }
    POINTS[(sector as i64).rem_euclid(8) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_cardinal_and_wraps() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(44.0), "NE");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(200.0), "S");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(360.0), "N");
        assert_eq!(compass_point(-45.0), "NW");
    }

    #[test]
    fn ties_round_to_even_sector() {
        assert_eq!(compass_point(22.5), "N");
        assert_eq!(compass_point(67.5), "E");
        assert_eq!(compass_point(112.5), "E");
        assert_eq!(compass_point(157.5), "S");
    }
}
