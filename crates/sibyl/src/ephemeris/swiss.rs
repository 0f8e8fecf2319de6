use crate::ephemeris::provider::PrimaryProvider;
use crate::ephemeris::types::{Body, RawBodyRecord};
use crate::error::ChartError;
use crate::time::JulianMoment;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use swisseph::swe::{calc_ut, houses_ex};
use swisseph::Cusp;

/// FLG_SWIEPH: read Swiss Ephemeris files (falls back to Moshier when absent)
const FLG_SWIEPH: i32 = 2;
/// FLG_SPEED: also compute daily motion
const FLG_SPEED: i32 = 256;

/// Environment variable the C library consults when resolving its data path
const SE_EPHE_PATH_VAR: &str = "SE_EPHE_PATH";
const PATH_OVERRIDE_VAR: &str = "SWISS_EPHEMERIS_PATH";

// Swiss Ephemeris body numbers. South node is derived from the true node.
const BODY_CODES: &[(Body, i32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Uranus, 7),
    (Body::Neptune, 8),
    (Body::Pluto, 9),
    (Body::NorthNode, 11), // TRUE_NODE
    (Body::Lilith, 12),    // MEAN_APOG
    (Body::Chiron, 15),
];

static PROVIDER: OnceLock<SwissEphemeris> = OnceLock::new();

/// Bootstrap settings for the primary provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemerisConfig {
    /// Directory holding the `.se1` data files; `SWISS_EPHEMERIS_PATH` is used when unset
    pub path: Option<PathBuf>,
}

impl EphemerisConfig {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn resolve_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| env::var(PATH_OVERRIDE_VAR).ok().map(PathBuf::from))
    }
}

/// Swiss Ephemeris primary provider.
///
/// There is one per process: obtain it with [`SwissEphemeris::initialize`]
/// and hand the returned reference to the chart engine.
#[derive(Debug)]
pub struct SwissEphemeris {
    ephemeris_path: Option<PathBuf>,
}

impl SwissEphemeris {
    /// Configure the ephemeris exactly once per process.
    ///
    /// Later calls (including concurrent first calls that lose the race)
    /// return the already-initialised handle and ignore their config.
    pub fn initialize(config: &EphemerisConfig) -> Result<&'static SwissEphemeris, ChartError> {
        if let Some(existing) = PROVIDER.get() {
            log::debug!("Swiss Ephemeris already initialised; ignoring new config");
            return Ok(existing);
        }

        let path = config.resolve_path();
        if let Some(p) = &path {
            if !p.exists() {
                return Err(ChartError::Ephemeris {
                    message: format!(
                        "Ephemeris path does not exist: {}. Please ensure Swiss Ephemeris data files are installed.",
                        p.display()
                    ),
                });
            }
        }

        Ok(PROVIDER.get_or_init(|| {
            match &path {
                Some(p) => {
                    // Runs once per process, before any provider call can reach the C library.
                    env::set_var(SE_EPHE_PATH_VAR, p);
                    log::info!("Swiss Ephemeris data path set to {}", p.display());
                }
                None => log::info!(
                    "No Swiss Ephemeris data path configured; using the library default"
                ),
            }
            SwissEphemeris {
                ephemeris_path: path,
            }
        }))
    }

    /// The provider, if `initialize` has run
    pub fn get() -> Option<&'static SwissEphemeris> {
        PROVIDER.get()
    }

    pub fn ephemeris_path(&self) -> Option<&Path> {
        self.ephemeris_path.as_deref()
    }

    fn body_code(body: Body) -> Option<i32> {
        BODY_CODES
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, code)| *code)
    }
}

impl PrimaryProvider for SwissEphemeris {
    fn compute_body_position(
        &self,
        body: Body,
        moment: &JulianMoment,
    ) -> Result<RawBodyRecord, ChartError> {
        if body == Body::SouthNode {
            let north = self.compute_body_position(Body::NorthNode, moment)?;
            return Ok(RawBodyRecord {
                longitude: (north.longitude + 180.0) % 360.0,
                latitude: north.latitude.map(|lat| -lat),
                speed: north.speed,
            });
        }

        let code = Self::body_code(body).ok_or(ChartError::ProviderUnavailable { body })?;

        // calc_ut applies the library's own Delta-T to the UT day
        let result = calc_ut(
            moment.julian_day_ut,
            code as u32,
            (FLG_SWIEPH | FLG_SPEED) as u32,
        )
        .map_err(|e| ChartError::Ephemeris {
            message: format!(
                "Swiss Ephemeris failed for {} at JD {}: {}",
                body, moment.julian_day_ut, e
            ),
        })?;

        let out = result.out;
        Ok(RawBodyRecord {
            longitude: out[0] % 360.0,
            latitude: Some(out[1]),
            speed: Some(out[3]),
        })
    }

    fn compute_house_cusps(
        &self,
        julian_day_ut: f64,
        latitude: f64,
        longitude: f64,
        system: char,
    ) -> Result<Vec<f64>, ChartError> {
        if !system.is_ascii() {
            return Err(ChartError::Ephemeris {
                message: format!("House system code must be a single ASCII letter, got {:?}", system),
            });
        }
        let (c, _ascmc) = houses_ex(julian_day_ut, FLG_SWIEPH, latitude, longitude, system as i32);
        let cusps = Cusp::from_array(c);
        Ok(vec![
            cusps.first,
            cusps.second,
            cusps.third,
            cusps.fourth,
            cusps.fifth,
            cusps.sixth,
            cusps.seventh,
            cusps.eighth,
            cusps.ninth,
            cusps.tenth,
            cusps.eleventh,
            cusps.twelfth,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_codes_cover_all_but_south_node() {
        for body in Body::ALL {
            let code = SwissEphemeris::body_code(body);
            if body == Body::SouthNode {
                assert!(code.is_none());
            } else {
                assert!(code.is_some(), "{} has no Swiss Ephemeris code", body);
            }
        }
    }

    #[test]
    fn test_missing_path_is_rejected() {
        let config = EphemerisConfig::with_path("/definitely/not/a/swisseph/dir");
        // Only meaningful while nothing else initialised the singleton first
        if SwissEphemeris::get().is_none() {
            assert!(matches!(
                SwissEphemeris::initialize(&config),
                Err(ChartError::Ephemeris { .. })
            ));
        }
    }
}
