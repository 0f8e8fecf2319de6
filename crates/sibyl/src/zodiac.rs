//! Zodiac signs, longitude normalisation and degree/minute/second splitting.
//!
//! Signs carry their element, quality and planetary rulers (traditional and modern).

use crate::ephemeris::types::Body;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SIGN_SPAN_DEG: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Cardinal,
    Fixed,
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// Sign from its 1-based index; out-of-range indices wrap
    pub fn from_index(index: u8) -> Sign {
        Sign::ALL[(usize::from(index).max(1) - 1) % 12]
    }

    /// 1-based index (Aries = 1)
    pub fn index(self) -> u8 {
        self as u8 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    pub fn element(self) -> Element {
        match self.index() % 4 {
            1 => Element::Fire,
            2 => Element::Earth,
            3 => Element::Air,
            _ => Element::Water,
        }
    }

    pub fn quality(self) -> Quality {
        match self.index() % 3 {
            1 => Quality::Cardinal,
            2 => Quality::Fixed,
            _ => Quality::Mutable,
        }
    }

    /// Planetary ruler; `modern` swaps in the outer planets for Scorpio, Aquarius and Pisces
    pub fn ruler(self, modern: bool) -> Body {
        match self {
            Sign::Aries => Body::Mars,
            Sign::Taurus => Body::Venus,
            Sign::Gemini => Body::Mercury,
            Sign::Cancer => Body::Moon,
            Sign::Leo => Body::Sun,
            Sign::Virgo => Body::Mercury,
            Sign::Libra => Body::Venus,
            Sign::Scorpio if modern => Body::Pluto,
            Sign::Scorpio => Body::Mars,
            Sign::Sagittarius => Body::Jupiter,
            Sign::Capricorn => Body::Saturn,
            Sign::Aquarius if modern => Body::Uranus,
            Sign::Aquarius => Body::Saturn,
            Sign::Pisces if modern => Body::Neptune,
            Sign::Pisces => Body::Jupiter,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Degrees, minutes and seconds of a longitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dms {
    /// Degrees within the sign, 0..=29
    #[serde(rename = "deg")]
    pub degrees: u32,
    #[serde(rename = "min")]
    pub minutes: u32,
    #[serde(rename = "sec")]
    pub seconds: u32,
}

/// Wrap a longitude into [0, 360)
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = longitude.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// 1-based sign index (1..=12) of a longitude
pub fn sign_index(longitude: f64) -> u8 {
    let index = (normalize_longitude(longitude) / SIGN_SPAN_DEG).floor() as u8 + 1;
    index.min(12)
}

pub fn sign_of(longitude: f64) -> Sign {
    Sign::from_index(sign_index(longitude))
}

/// Split a longitude into sign-relative degrees plus minutes and seconds.
///
/// Minutes and seconds come from the fractional part of the full normalised
/// longitude, not from the sign-relative remainder.
pub fn to_dms(longitude: f64) -> Dms {
    let normalized = normalize_longitude(longitude);
    let degrees = (normalized % SIGN_SPAN_DEG).floor() as u32;
    let fraction = normalized - normalized.floor();
    let total_minutes = fraction * 60.0;
    let minutes = total_minutes.floor();
    let seconds = ((total_minutes - minutes) * 60.0).floor();
    Dms {
        degrees,
        minutes: (minutes as u32).min(59),
        seconds: (seconds as u32).min(59),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_index_boundaries() {
        assert_eq!(sign_index(0.0), 1);
        assert_eq!(sign_index(29.999), 1);
        assert_eq!(sign_index(30.0), 2);
        assert_eq!(sign_index(359.999), 12);
        assert_eq!(sign_index(360.0), 1);
        assert_eq!(sign_index(-15.0), 12);
    }

    #[test]
    fn test_to_dms() {
        // 172 + 33/64 is exact in binary: 22° Virgo, 30' 56.25"
        let dms = to_dms(172.515625);
        assert_eq!(dms.degrees, 22);
        assert_eq!(dms.minutes, 30);
        assert_eq!(dms.seconds, 56);
    }

    #[test]
    fn test_tiny_negative_longitude_normalises_to_zero() {
        assert_eq!(normalize_longitude(-1e-18), 0.0);
        assert_eq!(sign_index(-1e-18), 1);
    }

    #[test]
    fn test_elements_and_qualities() {
        assert_eq!(Sign::Aries.element(), Element::Fire);
        assert_eq!(Sign::Virgo.element(), Element::Earth);
        assert_eq!(Sign::Aquarius.element(), Element::Air);
        assert_eq!(Sign::Pisces.element(), Element::Water);
        assert_eq!(Sign::Cancer.quality(), Quality::Cardinal);
        assert_eq!(Sign::Leo.quality(), Quality::Fixed);
        assert_eq!(Sign::Sagittarius.quality(), Quality::Mutable);
    }

    #[test]
    fn test_rulers() {
        assert_eq!(Sign::Aries.ruler(false), Body::Mars);
        assert_eq!(Sign::Scorpio.ruler(false), Body::Mars);
        assert_eq!(Sign::Scorpio.ruler(true), Body::Pluto);
        assert_eq!(Sign::Aquarius.ruler(true), Body::Uranus);
        assert_eq!(Sign::Pisces.ruler(true), Body::Neptune);
    }
}
