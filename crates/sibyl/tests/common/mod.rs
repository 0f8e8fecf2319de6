#![allow(dead_code)]

use sibyl::ephemeris::RawBodyRecord;
use sibyl::time::JulianMoment;
use sibyl::{Body, ChartError, PrimaryProvider};
use std::collections::{BTreeMap, BTreeSet};

/// House system code the mock refuses, to exercise degraded houses
pub const BROKEN_HOUSE_SYSTEM: char = 'Z';

/// Time-independent primary provider with scripted longitudes and failures
pub struct MockPrimary {
    longitudes: BTreeMap<Body, f64>,
    failing: BTreeSet<Body>,
    ascendant: f64,
}

impl MockPrimary {
    /// Body `i` (declaration order) at `3 + 25 * i` degrees, direct motion
    pub fn spread() -> Self {
        Self {
            longitudes: Body::ALL
                .iter()
                .enumerate()
                .map(|(i, body)| (*body, 3.0 + 25.0 * i as f64))
                .collect(),
            failing: BTreeSet::new(),
            ascendant: 0.0,
        }
    }

    pub fn with_longitude(mut self, body: Body, longitude: f64) -> Self {
        self.longitudes.insert(body, longitude);
        self
    }

    pub fn failing(mut self, body: Body) -> Self {
        self.failing.insert(body);
        self
    }

    pub fn with_ascendant(mut self, ascendant: f64) -> Self {
        self.ascendant = ascendant;
        self
    }
}

impl PrimaryProvider for MockPrimary {
    fn compute_body_position(
        &self,
        body: Body,
        _moment: &JulianMoment,
    ) -> Result<RawBodyRecord, ChartError> {
        if self.failing.contains(&body) {
            return Err(ChartError::ProviderUnavailable { body });
        }
        let longitude = self
            .longitudes
            .get(&body)
            .copied()
            .ok_or(ChartError::ProviderUnavailable { body })?;
        Ok(RawBodyRecord {
            longitude,
            latitude: Some(0.0),
            speed: Some(1.0),
        })
    }

    fn compute_house_cusps(
        &self,
        _julian_day_ut: f64,
        _latitude: f64,
        _longitude: f64,
        system: char,
    ) -> Result<Vec<f64>, ChartError> {
        if system == BROKEN_HOUSE_SYSTEM {
            return Err(ChartError::Ephemeris {
                message: format!("house system {} not available", system),
            });
        }
        Ok((0..12)
            .map(|i| (self.ascendant + 30.0 * i as f64) % 360.0)
            .collect())
    }
}

/// 1959-09-15 05:50 local, UTC-6, La Crosse WI
pub fn regression_moment() -> sibyl::BirthMoment {
    sibyl::BirthMoment::new(1959, 9, 15, 5, 50, 0, -6.0).at(43.6347, -91.4967)
}

pub fn angle_between(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}
