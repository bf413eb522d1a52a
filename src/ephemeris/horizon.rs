use serde::Serialize;

use super::orbits::Equatorial;
use super::time::local_sidereal_deg;
use crate::observer::Observer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Horizontal {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

/// Geometric altitude/azimuth of an equatorial position, azimuth measured from north through east.
pub fn to_horizontal(eq: &Equatorial, observer: &Observer) -> Horizontal {
    let lst = local_sidereal_deg(observer.time, observer.longitude_deg);
    let hour_angle = (lst - eq.ra_deg).to_radians();
    let dec = eq.dec_deg.to_radians();
    let (sin_lat, cos_lat) = observer.lat_rad().sin_cos();

    let x = hour_angle.cos() * dec.cos();
    let y = hour_angle.sin() * dec.cos();
    let z = dec.sin();

    let x_hor = x * sin_lat - z * cos_lat;
    let z_hor = x * cos_lat + z * sin_lat;

    Horizontal {
        altitude_deg: z_hor.clamp(-1.0, 1.0).asin().to_degrees(),
        azimuth_deg: (y.atan2(x_hor).to_degrees() + 180.0).rem_euclid(360.0),
    }
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}
