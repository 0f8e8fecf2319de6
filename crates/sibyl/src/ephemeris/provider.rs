//! Narrow adapter interfaces the rest of the engine depends on.
//!
//! Any ephemeris backend can sit behind these traits; the engine never talks
//! to a native library directly.

use crate::ephemeris::types::{Body, RawBodyRecord};
use crate::error::ChartError;
use crate::time::JulianMoment;

/// Full-precision ephemeris: positions with latitude and speed, plus house division
pub trait PrimaryProvider: Send + Sync {
    /// Raw position of `body` at `moment`.
    ///
    /// Fails with `ProviderUnavailable` for unsupported bodies and
    /// `Ephemeris` for data failures.
    fn compute_body_position(
        &self,
        body: Body,
        moment: &JulianMoment,
    ) -> Result<RawBodyRecord, ChartError>;

    /// Twelve raw house cusps (degrees) for the given system code, passed through unvalidated
    fn compute_house_cusps(
        &self,
        julian_day_ut: f64,
        latitude: f64,
        longitude: f64,
        system: char,
    ) -> Result<Vec<f64>, ChartError>;
}

/// Closed-form, longitude-only position formulas
pub trait SecondaryProvider: Send + Sync {
    fn supports(&self, body: Body) -> bool;

    fn compute_longitude(&self, body: Body, moment: &JulianMoment) -> Result<f64, ChartError>;
}
