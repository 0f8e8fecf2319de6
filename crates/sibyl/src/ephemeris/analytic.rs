//! Low-precision closed-form positions for the Sun, Moon and the planets.
//!
//! Sun: Meeus low-accuracy solar theory. Moon: leading terms of the ELP
//! series. Planets: JPL approximate Keplerian elements (1800-2050), reduced
//! to geocentric longitude of date. Longitudes only, good to a small
//! fraction of a degree.

use crate::ephemeris::provider::SecondaryProvider;
use crate::ephemeris::types::Body;
use crate::error::ChartError;
use crate::time::{JulianMoment, J2000_JD};
use crate::zodiac::normalize_longitude;

const DAYS_PER_CENTURY: f64 = 36_525.0;
/// General precession in longitude, degrees per Julian century
const PRECESSION_DEG_PER_CENTURY: f64 = 1.396_971_3;
/// Validity window of the planetary element table (1800-01-01 .. 2050-12-31)
const ELEMENTS_VALID_FROM_JD: f64 = 2_378_496.5;
const ELEMENTS_VALID_TO_JD: f64 = 2_470_171.5;

/// Keplerian elements at J2000 and their rates per century:
/// a (au), e, I, L, long. perihelion, long. ascending node (degrees)
struct OrbitalElements {
    a: [f64; 2],
    e: [f64; 2],
    i: [f64; 2],
    l: [f64; 2],
    perihelion: [f64; 2],
    node: [f64; 2],
}

const MERCURY: OrbitalElements = OrbitalElements {
    a: [0.38709927, 0.00000037],
    e: [0.20563593, 0.00001906],
    i: [7.00497902, -0.00594749],
    l: [252.25032350, 149472.67411175],
    perihelion: [77.45779628, 0.16047689],
    node: [48.33076593, -0.12534081],
};

const VENUS: OrbitalElements = OrbitalElements {
    a: [0.72333566, 0.00000390],
    e: [0.00677672, -0.00004107],
    i: [3.39467605, -0.00078890],
    l: [181.97909950, 58517.81538729],
    perihelion: [131.60246718, 0.00268329],
    node: [76.67984255, -0.27769418],
};

const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    a: [1.00000261, 0.00000562],
    e: [0.01671123, -0.00004392],
    i: [-0.00001531, -0.01294668],
    l: [100.46457166, 35999.37244981],
    perihelion: [102.93768193, 0.32327364],
    node: [0.0, 0.0],
};

const MARS: OrbitalElements = OrbitalElements {
    a: [1.52371034, 0.00001847],
    e: [0.09339410, 0.00007882],
    i: [1.84969142, -0.00813131],
    l: [-4.55343205, 19140.30268499],
    perihelion: [-23.94362959, 0.44441088],
    node: [49.55953891, -0.29257343],
};

const JUPITER: OrbitalElements = OrbitalElements {
    a: [5.20288700, -0.00011607],
    e: [0.04838624, -0.00013253],
    i: [1.30439695, -0.00183714],
    l: [34.39644051, 3034.74612775],
    perihelion: [14.72847983, 0.21252668],
    node: [100.47390909, 0.20469106],
};

const SATURN: OrbitalElements = OrbitalElements {
    a: [9.53667594, -0.00125060],
    e: [0.05386179, -0.00050991],
    i: [2.48599187, 0.00193609],
    l: [49.95424423, 1222.49362201],
    perihelion: [92.59887831, -0.41897216],
    node: [113.66242448, -0.28867794],
};

const URANUS: OrbitalElements = OrbitalElements {
    a: [19.18916464, -0.00196176],
    e: [0.04725744, -0.00004397],
    i: [0.77263783, -0.00242939],
    l: [313.23810451, 428.48202785],
    perihelion: [170.95427630, 0.40805281],
    node: [74.01692503, 0.04240589],
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    a: [30.06992276, 0.00026291],
    e: [0.00859048, 0.00005105],
    i: [1.77004347, 0.00035372],
    l: [-55.12002969, 218.45945325],
    perihelion: [44.96476227, -0.32241464],
    node: [131.78422574, -0.00508664],
};

const PLUTO: OrbitalElements = OrbitalElements {
    a: [39.48211675, -0.00031596],
    e: [0.24882730, 0.00005170],
    i: [17.14001206, 0.00004818],
    l: [238.92903833, 145.20780515],
    perihelion: [224.06891629, -0.04062942],
    node: [110.30393684, -0.01183482],
};

/// (multiples of D, M, M', F; coefficient in 1e-6 degrees)
const MOON_LONGITUDE_TERMS: &[(f64, f64, f64, f64, f64)] = &[
    (0.0, 0.0, 1.0, 0.0, 6_288_774.0),
    (2.0, 0.0, -1.0, 0.0, 1_274_027.0),
    (2.0, 0.0, 0.0, 0.0, 658_314.0),
    (0.0, 0.0, 2.0, 0.0, 213_618.0),
    (0.0, 1.0, 0.0, 0.0, -185_116.0),
    (0.0, 0.0, 0.0, 2.0, -114_332.0),
    (2.0, 0.0, -2.0, 0.0, 58_793.0),
    (2.0, -1.0, -1.0, 0.0, 57_066.0),
    (2.0, 0.0, 1.0, 0.0, 53_322.0),
    (2.0, -1.0, 0.0, 0.0, 45_758.0),
    (0.0, 1.0, -1.0, 0.0, -40_923.0),
    (1.0, 0.0, 0.0, 0.0, -34_720.0),
    (0.0, 1.0, 1.0, 0.0, -30_383.0),
    (2.0, 0.0, 0.0, -2.0, 15_327.0),
    (0.0, 0.0, 1.0, 2.0, -12_528.0),
    (0.0, 0.0, 1.0, -2.0, 10_980.0),
    (4.0, 0.0, -1.0, 0.0, 10_675.0),
    (0.0, 0.0, 3.0, 0.0, 10_034.0),
    (4.0, 0.0, -2.0, 0.0, 8_548.0),
    (2.0, 1.0, -1.0, 0.0, -7_888.0),
    (2.0, 1.0, 0.0, 0.0, -6_766.0),
    (1.0, 0.0, -1.0, 0.0, -5_163.0),
    (1.0, 1.0, 0.0, 0.0, 4_987.0),
    (2.0, -1.0, 1.0, 0.0, 4_036.0),
    (2.0, 0.0, 2.0, 0.0, 3_994.0),
];

/// Secondary provider backed by closed-form formulas
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl SecondaryProvider for AnalyticEphemeris {
    fn supports(&self, body: Body) -> bool {
        body.is_secondary_capable()
    }

    fn compute_longitude(&self, body: Body, moment: &JulianMoment) -> Result<f64, ChartError> {
        let jde = moment.julian_day_et;
        if !jde.is_finite() {
            return Err(ChartError::ephemeris("Julian Day (ET) is not finite"));
        }
        let t = (jde - J2000_JD) / DAYS_PER_CENTURY;

        let longitude = match body {
            Body::Sun => sun_longitude(t),
            Body::Moon => moon_longitude(t),
            _ => {
                let elements = planet_elements(body)
                    .ok_or(ChartError::ProviderUnavailable { body })?;
                if !(ELEMENTS_VALID_FROM_JD..=ELEMENTS_VALID_TO_JD).contains(&jde) {
                    return Err(ChartError::ephemeris(format!(
                        "Analytic elements for {} only cover 1800-2050 (JD {})",
                        body, jde
                    )));
                }
                planet_longitude(elements, t)
            }
        };
        Ok(normalize_longitude(longitude))
    }
}

fn planet_elements(body: Body) -> Option<&'static OrbitalElements> {
    match body {
        Body::Mercury => Some(&MERCURY),
        Body::Venus => Some(&VENUS),
        Body::Mars => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn => Some(&SATURN),
        Body::Uranus => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
        Body::Pluto => Some(&PLUTO),
        _ => None,
    }
}

/// Apparent geocentric longitude of the Sun, degrees
fn sun_longitude(t: f64) -> f64 {
    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t).to_radians();
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let omega = (125.04 - 1934.136 * t).to_radians();
    l0 + c - 0.00569 - 0.00478 * omega.sin()
}

/// Geocentric longitude of the Moon, degrees
fn moon_longitude(t: f64) -> f64 {
    let mean_longitude = 218.3164477 + 481267.88123421 * t;
    let d = (297.8501921 + 445267.1114034 * t).to_radians();
    let m = (357.5291092 + 35999.0502909 * t).to_radians();
    let m_prime = (134.9633964 + 477198.8675055 * t).to_radians();
    let f = (93.2720950 + 483202.0175233 * t).to_radians();
    let e = 1.0 - 0.002516 * t - 0.0000074 * t * t;

    let sum: f64 = MOON_LONGITUDE_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coefficient)| {
            let argument = cd * d + cm * m + cmp * m_prime + cf * f;
            let eccentricity_factor = e.powi(cm.abs() as i32);
            coefficient * eccentricity_factor * argument.sin()
        })
        .sum();

    mean_longitude + sum / 1_000_000.0
}

/// Geocentric ecliptic longitude of date for a planet, degrees
fn planet_longitude(elements: &OrbitalElements, t: f64) -> f64 {
    let planet = heliocentric_position(elements, t);
    let earth = heliocentric_position(&EARTH_MOON_BARYCENTER, t);
    let x = planet[0] - earth[0];
    let y = planet[1] - earth[1];
    y.atan2(x).to_degrees() + PRECESSION_DEG_PER_CENTURY * t
}

/// Heliocentric ecliptic coordinates (J2000 frame, au)
fn heliocentric_position(el: &OrbitalElements, t: f64) -> [f64; 3] {
    let at = |pair: [f64; 2]| pair[0] + pair[1] * t;
    let a = at(el.a);
    let e = at(el.e);
    let inclination = at(el.i).to_radians();
    let mean_longitude = at(el.l);
    let perihelion = at(el.perihelion);
    let node = at(el.node);

    let argument_of_perihelion = (perihelion - node).to_radians();
    let mut mean_anomaly = (mean_longitude - perihelion).rem_euclid(360.0);
    if mean_anomaly > 180.0 {
        mean_anomaly -= 360.0;
    }
    let ecc_anomaly = solve_kepler(mean_anomaly.to_radians(), e);

    let x_orb = a * (ecc_anomaly.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

    let (sin_w, cos_w) = argument_of_perihelion.sin_cos();
    let (sin_n, cos_n) = node.to_radians().sin_cos();
    let (sin_i, cos_i) = inclination.sin_cos();

    [
        (cos_w * cos_n - sin_w * sin_n * cos_i) * x_orb
            + (-sin_w * cos_n - cos_w * sin_n * cos_i) * y_orb,
        (cos_w * sin_n + sin_w * cos_n * cos_i) * x_orb
            + (-sin_w * sin_n + cos_w * cos_n * cos_i) * y_orb,
        (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb,
    ]
}

/// Newton iteration for E - e sin E = M (radians)
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc_anomaly = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..50 {
        let delta = (ecc_anomaly - e * ecc_anomaly.sin() - mean_anomaly)
            / (1.0 - e * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc_anomaly
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(jd_ut: f64) -> JulianMoment {
        JulianMoment::from_ut(jd_ut).unwrap()
    }

    fn angular_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_sun_at_j2000() {
        // Sun was near 280.4 degrees at J2000.0
        let lon = AnalyticEphemeris
            .compute_longitude(Body::Sun, &moment(J2000_JD))
            .unwrap();
        assert!(angular_gap(lon, 280.37) < 0.1, "sun {}", lon);
    }

    #[test]
    fn test_sun_meeus_example() {
        // Meeus example 25.a: 1992-10-13 0h TD, apparent longitude 199.909 degrees
        let m = JulianMoment {
            julian_day_ut: 2_448_908.5,
            julian_day_et: 2_448_908.5,
        };
        let lon = AnalyticEphemeris.compute_longitude(Body::Sun, &m).unwrap();
        assert!(angular_gap(lon, 199.909) < 0.01, "sun {}", lon);
    }

    #[test]
    fn test_moon_meeus_example() {
        // Meeus example 47.a: 1992-04-12 0h TD, longitude 133.162 degrees
        let m = JulianMoment {
            julian_day_ut: 2_448_724.5,
            julian_day_et: 2_448_724.5,
        };
        let lon = AnalyticEphemeris.compute_longitude(Body::Moon, &m).unwrap();
        assert!(angular_gap(lon, 133.162) < 0.3, "moon {}", lon);
    }

    #[test]
    fn test_sun_in_virgo_mid_september_1959() {
        // 1959-09-15 11:50 UT
        let lon = AnalyticEphemeris
            .compute_longitude(Body::Sun, &moment(2_436_826.993_055_6))
            .unwrap();
        assert!((150.0..180.0).contains(&lon), "sun {}", lon);
    }

    #[test]
    fn test_planets_stay_in_range() {
        let m = moment(J2000_JD);
        for body in Body::ALL.iter().copied().filter(|b| b.is_secondary_capable()) {
            let lon = AnalyticEphemeris.compute_longitude(body, &m).unwrap();
            assert!((0.0..360.0).contains(&lon), "{} -> {}", body, lon);
        }
    }

    #[test]
    fn test_jupiter_near_j2000_reference() {
        // Jupiter stood at roughly 25 degrees Aries at the start of 2000
        let lon = AnalyticEphemeris
            .compute_longitude(Body::Jupiter, &moment(J2000_JD))
            .unwrap();
        assert!(angular_gap(lon, 25.2) < 1.0, "jupiter {}", lon);
    }

    #[test]
    fn test_planets_outside_window_fail() {
        // 1700-01-01
        let m = moment(2_342_032.5);
        assert!(matches!(
            AnalyticEphemeris.compute_longitude(Body::Saturn, &m),
            Err(ChartError::Ephemeris { .. })
        ));
        assert!(AnalyticEphemeris.compute_longitude(Body::Sun, &m).is_ok());
    }

    #[test]
    fn test_unsupported_body() {
        let m = moment(J2000_JD);
        assert!(!AnalyticEphemeris.supports(Body::Chiron));
        assert!(matches!(
            AnalyticEphemeris.compute_longitude(Body::Chiron, &m),
            Err(ChartError::ProviderUnavailable { .. })
        ));
    }

    #[test]
    fn test_kepler_solution_satisfies_equation() {
        let m = 1.234_f64;
        let e = 0.2;
        let ea = solve_kepler(m, e);
        assert!((ea - e * ea.sin() - m).abs() < 1e-10);
    }
}
