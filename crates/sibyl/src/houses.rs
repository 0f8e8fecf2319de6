//! House cusps and the four angles.
//!
//! Division is delegated to the primary provider; this module only validates
//! the twelve raw cusps, picks the angles out of them and places bodies.

use crate::ephemeris::provider::PrimaryProvider;
use crate::error::ChartError;
use crate::zodiac::{self, Dms, Sign};
use serde::{Deserialize, Serialize};

/// Placidus
pub const DEFAULT_HOUSE_SYSTEM: char = 'P';

const HOUSE_COUNT: usize = 12;
const ASC_INDEX: usize = 0;
const IC_INDEX: usize = 3;
const DC_INDEX: usize = 6;
const MC_INDEX: usize = 9;

/// A zodiac position that is not a body (cusp or angle)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub longitude_deg: f64,
    pub sign_index: u8,
    pub sign: Sign,
    pub dms: Dms,
}

impl ChartPoint {
    pub fn from_longitude(longitude: f64) -> Self {
        let longitude = zodiac::normalize_longitude(longitude);
        let sign_index = zodiac::sign_index(longitude);
        Self {
            longitude_deg: longitude,
            sign_index,
            sign: Sign::from_index(sign_index),
            dms: zodiac::to_dms(longitude),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    /// House number, 1..=12
    pub house: u8,
    #[serde(flatten)]
    pub point: ChartPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    pub asc: ChartPoint,
    pub dc: ChartPoint,
    pub mc: ChartPoint,
    pub ic: ChartPoint,
}

/// Cusps and angles for one chart; both empty when houses could not be divided
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseSystem {
    pub system: char,
    pub cusps: Vec<HouseCusp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angles: Option<Angles>,
}

impl HouseSystem {
    pub fn empty(system: char) -> Self {
        Self {
            system,
            cusps: Vec::new(),
            angles: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cusps.is_empty()
    }

    /// Validate twelve raw cusps from a backend and pick out the angles
    pub fn decode(system: char, raw_cusps: &[f64]) -> Result<Self, ChartError> {
        if raw_cusps.len() != HOUSE_COUNT {
            return Err(ChartError::Decode {
                subject: "houses".to_string(),
                message: format!("expected {} cusps, got {}", HOUSE_COUNT, raw_cusps.len()),
            });
        }
        if let Some((i, value)) = raw_cusps.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ChartError::Decode {
                subject: "houses".to_string(),
                message: format!("cusp {} is not finite ({})", i + 1, value),
            });
        }

        let cusps: Vec<HouseCusp> = raw_cusps
            .iter()
            .enumerate()
            .map(|(i, &longitude)| HouseCusp {
                house: i as u8 + 1,
                point: ChartPoint::from_longitude(longitude),
            })
            .collect();
        let angles = Angles {
            asc: cusps[ASC_INDEX].point,
            dc: cusps[DC_INDEX].point,
            mc: cusps[MC_INDEX].point,
            ic: cusps[IC_INDEX].point,
        };

        Ok(Self {
            system,
            cusps,
            angles: Some(angles),
        })
    }

    /// House (1..=12) containing `longitude`, or `None` without cusps
    pub fn house_of(&self, longitude: f64) -> Option<u8> {
        if self.cusps.len() != HOUSE_COUNT {
            return None;
        }
        let longitude = zodiac::normalize_longitude(longitude);
        self.cusps.iter().enumerate().find_map(|(i, cusp)| {
            let start = cusp.point.longitude_deg;
            let end = self.cusps[(i + 1) % HOUSE_COUNT].point.longitude_deg;
            let span = (end - start).rem_euclid(360.0);
            let offset = (longitude - start).rem_euclid(360.0);
            (offset < span).then_some(cusp.house)
        })
    }

    pub fn rising_sign(&self) -> Option<Sign> {
        self.angles.map(|a| a.asc.sign)
    }
}

/// Divide houses, failing when coordinates are missing or the backend errors
pub fn try_compute_houses(
    primary: &dyn PrimaryProvider,
    julian_day_ut: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    system: char,
) -> Result<HouseSystem, ChartError> {
    let (lat, lon) = match (latitude, longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(ChartError::HouseSystemUnavailable {
                reason: "birth latitude and longitude are both required".to_string(),
            })
        }
    };

    let raw = primary.compute_house_cusps(julian_day_ut, lat, lon, system)?;
    HouseSystem::decode(system, &raw)
}

/// Like [`try_compute_houses`] but degrades to an empty house system
pub fn compute_houses(
    primary: &dyn PrimaryProvider,
    julian_day_ut: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    system: char,
) -> HouseSystem {
    match try_compute_houses(primary, julian_day_ut, latitude, longitude, system) {
        Ok(houses) => houses,
        Err(e @ ChartError::HouseSystemUnavailable { .. }) => {
            log::debug!("{}", e);
            HouseSystem::empty(system)
        }
        Err(e) => {
            log::warn!("House division failed, continuing without houses: {}", e);
            HouseSystem::empty(system)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even_cusps(asc: f64) -> Vec<f64> {
        (0..12).map(|i| (asc + 30.0 * i as f64) % 360.0).collect()
    }

    #[test]
    fn test_decode_picks_angles_by_position() {
        let houses = HouseSystem::decode('P', &even_cusps(15.0)).unwrap();
        let angles = houses.angles.unwrap();
        assert_eq!(angles.asc.longitude_deg, 15.0);
        assert_eq!(angles.ic.longitude_deg, 105.0);
        assert_eq!(angles.dc.longitude_deg, 195.0);
        assert_eq!(angles.mc.longitude_deg, 285.0);
        assert_eq!(houses.rising_sign(), Some(Sign::Aries));
    }

    #[test]
    fn test_decode_rejects_short_or_nan() {
        assert!(matches!(
            HouseSystem::decode('P', &[0.0; 11]),
            Err(ChartError::Decode { .. })
        ));
        let mut cusps = even_cusps(0.0);
        cusps[4] = f64::NAN;
        assert!(HouseSystem::decode('P', &cusps).is_err());
    }

    #[test]
    fn test_house_of_wraps_through_aries() {
        let houses = HouseSystem::decode('P', &even_cusps(345.0)).unwrap();
        assert_eq!(houses.house_of(350.0), Some(1));
        assert_eq!(houses.house_of(10.0), Some(1));
        assert_eq!(houses.house_of(15.0), Some(2));
        assert_eq!(houses.house_of(344.0), Some(12));
        assert_eq!(HouseSystem::empty('P').house_of(10.0), None);
    }

    #[test]
    fn test_cusp_json_is_flat() {
        let houses = HouseSystem::decode('K', &even_cusps(0.0)).unwrap();
        let json = serde_json::to_value(&houses).unwrap();
        assert_eq!(json["system"], "K");
        assert_eq!(json["cusps"][1]["house"], 2);
        assert_eq!(json["cusps"][1]["longitudeDeg"], 30.0);
        assert_eq!(json["angles"]["mc"]["sign"], "Capricorn");
    }
}
