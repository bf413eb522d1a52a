//! Mean orbital elements of the Sun and naked-eye planets as linear
//! functions of the day number, good to a few arcminutes over a few centuries.
//! Element values follow Paul Schlyter's "How to compute planetary positions".

use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Planet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

impl Planet {
    pub const ALL: [Planet; 5] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
    ];

    fn elements(self, d: f64) -> Elements {
        match self {
            Planet::Mercury => Elements {
                node: 48.3313 + 3.24587e-5 * d,
                incl: 7.0047 + 5.00e-8 * d,
                peri: 29.1241 + 1.01444e-5 * d,
                a: 0.387_098,
                e: 0.205_635 + 5.59e-10 * d,
                mean_anomaly: 168.6562 + 4.092_334_436_8 * d,
            },
            Planet::Venus => Elements {
                node: 76.6799 + 2.46590e-5 * d,
                incl: 3.3946 + 2.75e-8 * d,
                peri: 54.8910 + 1.38374e-5 * d,
                a: 0.723_330,
                e: 0.006_773 - 1.302e-9 * d,
                mean_anomaly: 48.0052 + 1.602_130_224_4 * d,
            },
            Planet::Mars => Elements {
                node: 49.5574 + 2.11081e-5 * d,
                incl: 1.8497 - 1.78e-8 * d,
                peri: 286.5016 + 2.92961e-5 * d,
                a: 1.523_688,
                e: 0.093_405 + 2.516e-9 * d,
                mean_anomaly: 18.6021 + 0.524_020_776_6 * d,
            },
            Planet::Jupiter => Elements {
                node: 100.4542 + 2.76854e-5 * d,
                incl: 1.3030 - 1.557e-7 * d,
                peri: 273.8777 + 1.64505e-5 * d,
                a: 5.202_56,
                e: 0.048_498 + 4.469e-9 * d,
                mean_anomaly: 19.8950 + 0.083_085_300_1 * d,
            },
            Planet::Saturn => Elements {
                node: 113.6634 + 2.38980e-5 * d,
                incl: 2.4886 - 1.081e-7 * d,
                peri: 339.3939 + 2.97661e-5 * d,
                a: 9.554_75,
                e: 0.055_546 - 9.499e-9 * d,
                mean_anomaly: 316.9670 + 0.033_444_228_2 * d,
            },
        }
    }
}

/// Angles in degrees, `a` in AU.
#[derive(Debug, Clone, Copy)]
struct Elements {
    node: f64,
    incl: f64,
    peri: f64,
    a: f64,
    e: f64,
    mean_anomaly: f64,
}

impl Elements {
    /// Distance and true anomaly (degrees).
    fn in_plane(&self) -> (f64, f64) {
        let m = self.mean_anomaly.rem_euclid(360.0).to_radians();
        let ea = solve_kepler(m, self.e);
        let xv = self.a * (ea.cos() - self.e);
        let yv = self.a * (1.0 - self.e * self.e).sqrt() * ea.sin();
        (xv.hypot(yv), yv.atan2(xv).to_degrees())
    }

    /// Rectangular ecliptic coordinates about the primary.
    fn ecliptic(&self) -> [f64; 3] {
        let (r, v) = self.in_plane();
        let (sin_n, cos_n) = self.node.to_radians().sin_cos();
        let (sin_i, cos_i) = self.incl.to_radians().sin_cos();
        let (sin_u, cos_u) = (v + self.peri).to_radians().sin_cos();
        [
            r * (cos_n * cos_u - sin_n * sin_u * cos_i),
            r * (sin_n * cos_u + cos_n * sin_u * cos_i),
            r * sin_u * sin_i,
        ]
    }
}

fn solve_kepler(m: f64, e: f64) -> f64 {
    let mut ea = m + e * m.sin() * (1.0 + e * m.cos());
    for _ in 0..8 {
        ea -= (ea - e * ea.sin() - m) / (1.0 - e * ea.cos());
    }
    ea
}

fn sun_elements(d: f64) -> Elements {
    Elements {
        node: 0.0,
        incl: 0.0,
        peri: 282.9404 + 4.70935e-5 * d,
        a: 1.0,
        e: 0.016_709 - 1.151e-9 * d,
        mean_anomaly: 356.0470 + 0.985_600_258_5 * d,
    }
}

pub fn obliquity_deg(d: f64) -> f64 {
    23.4393 - 3.563e-7 * d
}

/// Geocentric ecliptic position of the Sun, AU.
pub fn sun_ecliptic(d: f64) -> [f64; 3] {
    sun_elements(d).ecliptic()
}

/// Geocentric ecliptic position of a planet, AU.
pub fn planet_ecliptic(planet: Planet, d: f64) -> [f64; 3] {
    let helio = perturbed(planet, d, planet.elements(d).ecliptic());
    let sun = sun_ecliptic(d);
    [helio[0] + sun[0], helio[1] + sun[1], helio[2]]
}

// Jupiter and Saturn pull on each other enough to matter at the degree level.
fn perturbed(planet: Planet, d: f64, helio: [f64; 3]) -> [f64; 3] {
    if !matches!(planet, Planet::Jupiter | Planet::Saturn) {
        return helio;
    }
    let mj = Planet::Jupiter.elements(d).mean_anomaly;
    let ms = Planet::Saturn.elements(d).mean_anomaly;
    let (mut lon, mut lat, r) = spherical(helio[0], helio[1], helio[2]);

    if planet == Planet::Jupiter {
        lon += -0.332 * sind(2.0 * mj - 5.0 * ms - 67.6) - 0.056 * sind(2.0 * mj - 2.0 * ms + 21.0)
            + 0.042 * sind(3.0 * mj - 5.0 * ms + 21.0)
            - 0.036 * sind(mj - 2.0 * ms)
            + 0.022 * cosd(mj - ms)
            + 0.023 * sind(2.0 * mj - 3.0 * ms + 52.0)
            - 0.016 * sind(mj - 5.0 * ms - 69.0);
    } else {
        lon += 0.812 * sind(2.0 * mj - 5.0 * ms - 67.6) - 0.229 * cosd(2.0 * mj - 4.0 * ms - 2.0)
            + 0.119 * sind(mj - 2.0 * ms - 3.0)
            + 0.046 * sind(2.0 * mj - 6.0 * ms - 69.0)
            + 0.014 * sind(mj - 3.0 * ms + 32.0);
        lat += -0.020 * cosd(2.0 * mj - 4.0 * ms - 2.0) + 0.018 * sind(2.0 * mj - 6.0 * ms - 49.0);
    }

    rectangular(lon, lat, r)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

/// Rotate ecliptic coordinates of date into right ascension and declination.
pub fn to_equatorial(ecl: [f64; 3], d: f64) -> Equatorial {
    let (sin_e, cos_e) = obliquity_deg(d).to_radians().sin_cos();
    let x = ecl[0];
    let y = ecl[1] * cos_e - ecl[2] * sin_e;
    let z = ecl[1] * sin_e + ecl[2] * cos_e;
    Equatorial {
        ra_deg: y.atan2(x).to_degrees().rem_euclid(360.0),
        dec_deg: z.atan2(x.hypot(y)).to_degrees(),
    }
}

fn spherical(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    (
        y.atan2(x).to_degrees(),
        z.atan2(x.hypot(y)).to_degrees(),
        (x * x + y * y + z * z).sqrt(),
    )
}

fn rectangular(lon: f64, lat: f64, r: f64) -> [f64; 3] {
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    [r * cos_lon * cos_lat, r * sin_lon * cos_lat, r * sin_lat]
}

fn sind(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cosd(deg: f64) -> f64 {
    deg.to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: [f64; 3]) -> f64 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn kepler_solution_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.2), (2.5, 0.05), (5.9, 0.0167)] {
            let ea = solve_kepler(m, e);
            assert!((ea - e * ea.sin() - m).abs() < 1e-12);
        }
    }

    #[test]
    fn sun_distance_stays_near_one_au() {
        for day in (0..3650).step_by(37) {
            let r = norm(sun_ecliptic(day as f64 + 8_000.0));
            assert!((0.98..=1.02).contains(&r), "r = {r}");
        }
    }

    #[test]
    fn sun_longitude_near_equinox() {
        // 2024-03-20 03:06 UTC
        let [x, y, _] = sun_ecliptic(8_846.129);
        let lon = y.atan2(x).to_degrees().rem_euclid(360.0);
        assert!(lon < 0.05 || lon > 359.95, "lon = {lon}");
    }

    #[test]
    fn planet_distances_are_plausible() {
        let bounds = [
            (Planet::Mercury, 0.5, 1.5),
            (Planet::Venus, 0.25, 1.75),
            (Planet::Mars, 0.35, 2.7),
            (Planet::Jupiter, 3.9, 6.5),
            (Planet::Saturn, 7.9, 11.2),
        ];
        for day in [8_000.0, 9_000.0, 10_000.0] {
            for (planet, lo, hi) in bounds {
                let r = norm(planet_ecliptic(planet, day));
                assert!(r > lo && r < hi, "{planet} at {r} AU");
            }
        }
    }

    #[test]
    fn ecliptic_pole_maps_to_obliquity() {
        let eq = to_equatorial([0.0, 0.0, 1.0], 0.0);
        assert!((eq.dec_deg - (90.0 - obliquity_deg(0.0))).abs() < 1e-9);
    }

    #[test]
    fn planet_names_display() {
        assert_eq!(Planet::Jupiter.to_string(), "Jupiter");
        assert_eq!(Planet::ALL.len(), 5);
    }
}
