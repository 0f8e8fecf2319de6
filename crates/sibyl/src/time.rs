//! Civil time to Julian Day conversion (UT and Ephemeris Time).

use crate::error::ChartError;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z)
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian Day of J2000.0
pub const J2000_JD: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// A birth moment as entered by the user: local civil time plus UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthMoment {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Geographic latitude in degrees, north positive
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Geographic longitude in degrees, east positive
    #[serde(default)]
    pub longitude: Option<f64>,
    pub utc_offset_hours: f64,
}

impl BirthMoment {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        utc_offset_hours: f64,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            latitude: None,
            longitude: None,
            utc_offset_hours,
        }
    }

    /// Attach geographic coordinates
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// The UTC instant of this moment.
    ///
    /// Fields are added onto the first of the month as a plain offset, so an
    /// out-of-range UTC hour (or day of month) carries into the following or
    /// preceding day, month and year.
    pub fn utc_instant(&self) -> Result<DateTime<Utc>, ChartError> {
        if !self.utc_offset_hours.is_finite() {
            return Err(ChartError::invalid_input(format!(
                "UTC offset must be finite, got {}",
                self.utc_offset_hours
            )));
        }
        let month_start = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                ChartError::invalid_input(format!(
                    "No such calendar month: {}-{:02}",
                    self.year, self.month
                ))
            })?;

        let out_of_range = || ChartError::invalid_input("Birth moment is outside the calendar range");

        let offset_ms = (self.utc_offset_hours * MS_PER_HOUR).round();
        if offset_ms.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        let local_ms = (i64::from(self.day) - 1) * 86_400_000
            + i64::from(self.hour) * 3_600_000
            + i64::from(self.minute) * 60_000
            + i64::from(self.second) * 1_000;
        let elapsed_ms = local_ms
            .checked_sub(offset_ms as i64)
            .ok_or_else(out_of_range)?;

        let naive = month_start
            .checked_add_signed(Duration::milliseconds(elapsed_ms))
            .ok_or_else(out_of_range)?;
        Ok(Utc.from_utc_datetime(&naive))
    }
}

/// Julian Day pair for one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JulianMoment {
    #[serde(rename = "julianDayUT")]
    pub julian_day_ut: f64,
    #[serde(rename = "julianDayET")]
    pub julian_day_et: f64,
}

impl JulianMoment {
    pub fn from_ut(julian_day_ut: f64) -> Result<Self, ChartError> {
        Ok(Self {
            julian_day_ut,
            julian_day_et: to_julian_day_et(julian_day_ut)?,
        })
    }

    pub fn from_birth(moment: &BirthMoment) -> Result<Self, ChartError> {
        Self::from_ut(to_julian_day_ut(moment)?)
    }
}

/// Julian Day (UT) of a civil birth moment
pub fn to_julian_day_ut(moment: &BirthMoment) -> Result<f64, ChartError> {
    Ok(datetime_to_julian_day(moment.utc_instant()?))
}

/// Convert a UTC datetime to a proleptic-Gregorian Julian Day
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Ephemeris Time Julian Day from a Universal Time Julian Day
pub fn to_julian_day_et(julian_day_ut: f64) -> Result<f64, ChartError> {
    if !julian_day_ut.is_finite() {
        return Err(ChartError::ephemeris(format!(
            "Delta-T is not tabulated for Julian Day {}",
            julian_day_ut
        )));
    }
    let delta_t = delta_t_seconds(decimal_year(julian_day_ut));
    Ok(julian_day_ut + delta_t / SECONDS_PER_DAY)
}

/// Approximate decimal year for a Julian Day
pub fn decimal_year(julian_day: f64) -> f64 {
    2000.0 + (julian_day - J2000_JD) / 365.25
}

/// Delta-T (TT - UT) in seconds, Espenak & Meeus polynomial fits.
pub fn delta_t_seconds(year: f64) -> f64 {
    let y = year;
    if y < -500.0 {
        long_term_parabola(y)
    } else if y < 500.0 {
        let u = y / 100.0;
        poly(
            u,
            &[
                10583.6,
                -1014.41,
                33.78311,
                -5.952053,
                -0.1798452,
                0.022174192,
                0.0090316521,
            ],
        )
    } else if y < 1600.0 {
        let u = (y - 1000.0) / 100.0;
        poly(
            u,
            &[
                1574.2,
                -556.01,
                71.23472,
                0.319781,
                -0.8503463,
                -0.005050998,
                0.0083572073,
            ],
        )
    } else if y < 1700.0 {
        let t = y - 1600.0;
        120.0 - 0.9808 * t - 0.01532 * t * t + t.powi(3) / 7129.0
    } else if y < 1800.0 {
        let t = y - 1700.0;
        8.83 + 0.1603 * t - 0.0059285 * t * t + 0.00013336 * t.powi(3) - t.powi(4) / 1_174_000.0
    } else if y < 1860.0 {
        let t = y - 1800.0;
        poly(
            t,
            &[
                13.72,
                -0.332447,
                0.0068612,
                0.0041116,
                -0.00037436,
                0.0000121272,
                -0.0000001699,
                0.000000000875,
            ],
        )
    } else if y < 1900.0 {
        let t = y - 1860.0;
        7.62 + 0.5737 * t - 0.251754 * t * t + 0.01680668 * t.powi(3) - 0.0004473624 * t.powi(4)
            + t.powi(5) / 233_174.0
    } else if y < 1920.0 {
        let t = y - 1900.0;
        poly(t, &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197])
    } else if y < 1941.0 {
        let t = y - 1920.0;
        poly(t, &[21.20, 0.84493, -0.076100, 0.0020936])
    } else if y < 1961.0 {
        let t = y - 1950.0;
        29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
    } else if y < 1986.0 {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
    } else if y < 2005.0 {
        let t = y - 2000.0;
        poly(
            t,
            &[63.86, 0.3345, -0.060374, 0.0017275, 0.000651814, 0.00002373599],
        )
    } else if y < 2050.0 {
        let t = y - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t * t
    } else if y < 2150.0 {
        long_term_parabola(y) - 0.5628 * (2150.0 - y)
    } else {
        long_term_parabola(y)
    }
}

fn long_term_parabola(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// Horner evaluation, coefficients in ascending order
fn poly(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000_noon() {
        let moment = BirthMoment::new(2000, 1, 1, 12, 0, 0, 0.0);
        assert!((to_julian_day_ut(&moment).unwrap() - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn test_negative_offset_carries_into_next_year() {
        // 20:00 at UTC-5 on new year's eve is 01:00 UTC on 2000-01-01
        let moment = BirthMoment::new(1999, 12, 31, 20, 0, 0, -5.0);
        let instant = moment.utc_instant().unwrap();
        assert_eq!(instant.to_rfc3339(), "2000-01-01T01:00:00+00:00");
        let jd = to_julian_day_ut(&moment).unwrap();
        assert!((jd - (2_451_544.5 + 1.0 / 24.0)).abs() < 1e-9);
    }

    #[test]
    fn test_positive_offset_borrows_from_previous_day() {
        let moment = BirthMoment::new(2000, 3, 1, 1, 0, 0, 3.0);
        let instant = moment.utc_instant().unwrap();
        assert_eq!(instant.to_rfc3339(), "2000-02-29T22:00:00+00:00");
    }

    #[test]
    fn test_day_overflow_carries_into_next_month() {
        let moment = BirthMoment::new(2021, 4, 31, 0, 0, 0, 0.0);
        let instant = moment.utc_instant().unwrap();
        assert_eq!(instant.to_rfc3339(), "2021-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_fractional_offset() {
        let moment = BirthMoment::new(1990, 6, 15, 10, 0, 0, 5.5);
        let instant = moment.utc_instant().unwrap();
        assert_eq!(instant.to_rfc3339(), "1990-06-15T04:30:00+00:00");
    }

    #[test]
    fn test_invalid_month_rejected() {
        let moment = BirthMoment::new(2000, 13, 1, 0, 0, 0, 0.0);
        assert!(matches!(
            to_julian_day_ut(&moment),
            Err(ChartError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_huge_offsets_are_rejected() {
        for offset in [-1e13, 1e13, -1e12, 1e12, f64::MAX] {
            let moment = BirthMoment::new(2000, 1, 1, 0, 0, 0, offset);
            assert!(
                matches!(to_julian_day_ut(&moment), Err(ChartError::InvalidInput { .. })),
                "offset {}",
                offset
            );
        }
        assert!(matches!(
            to_julian_day_ut(&BirthMoment::new(2000, 1, 1, 0, 0, 0, f64::NAN)),
            Err(ChartError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_delta_t_reference_values() {
        assert!((delta_t_seconds(2000.0) - 63.86).abs() < 1e-9);
        assert!((delta_t_seconds(1900.0) + 2.79).abs() < 1e-9);
        // Around the 1959 regression birth date ΔT is roughly 33 seconds
        let dt = delta_t_seconds(1959.7);
        assert!(dt > 32.0 && dt < 34.0, "delta-t {}", dt);
    }

    #[test]
    fn test_delta_t_is_continuous_at_2050() {
        let before = delta_t_seconds(2049.999);
        let after = delta_t_seconds(2050.0);
        assert!((before - after).abs() < 1.0);
    }

    #[test]
    fn test_et_is_later_than_ut() {
        let jm = JulianMoment::from_ut(J2000_JD).unwrap();
        let seconds = (jm.julian_day_et - jm.julian_day_ut) * SECONDS_PER_DAY;
        assert!((seconds - 63.86).abs() < 0.01);
    }

    #[test]
    fn test_non_finite_jd_fails() {
        assert!(matches!(
            to_julian_day_et(f64::NAN),
            Err(ChartError::Ephemeris { .. })
        ));
    }
}
