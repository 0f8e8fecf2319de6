use crate::error::ChartError;
use crate::zodiac::{self, Dms, Sign};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bodies the engine knows how to place
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
    SouthNode,
    /// Mean lunar apogee (Black Moon Lilith)
    Lilith,
}

impl Body {
    /// Every supported body, in chart iteration order
    pub const ALL: [Body; 14] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
        Body::NorthNode,
        Body::SouthNode,
        Body::Lilith,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::Chiron => "chiron",
            Body::NorthNode => "north_node",
            Body::SouthNode => "south_node",
            Body::Lilith => "lilith",
        }
    }

    /// Orb strictness class of the body
    pub fn tier(self) -> Tier {
        match self {
            Body::Sun | Body::Moon => Tier::Luminary,
            Body::Mercury | Body::Venus | Body::Mars => Tier::Personal,
            Body::Jupiter | Body::Saturn => Tier::Social,
            Body::Uranus | Body::Neptune | Body::Pluto => Tier::Transpersonal,
            Body::Chiron | Body::NorthNode | Body::SouthNode | Body::Lilith => Tier::Other,
        }
    }

    /// Whether the closed-form analytic formulas cover this body
    pub fn is_secondary_capable(self) -> bool {
        matches!(
            self,
            Body::Sun
                | Body::Moon
                | Body::Mercury
                | Body::Venus
                | Body::Mars
                | Body::Jupiter
                | Body::Saturn
                | Body::Uranus
                | Body::Neptune
                | Body::Pluto
        )
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Body {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.id() == wanted)
            .ok_or_else(|| ChartError::InvalidInput {
                message: format!(
                    "Unknown body: {}. Valid bodies: {:?}",
                    s,
                    Body::ALL.iter().map(|b| b.id()).collect::<Vec<_>>()
                ),
            })
    }
}

/// Orb class; every body belongs to exactly one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Luminary,
    Personal,
    Social,
    Transpersonal,
    Other,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Luminary,
        Tier::Personal,
        Tier::Social,
        Tier::Transpersonal,
        Tier::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tier::Luminary => "luminary",
            Tier::Personal => "personal",
            Tier::Social => "social",
            Tier::Transpersonal => "transpersonal",
            Tier::Other => "other",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl FromStr for Tier {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Tier::ALL
            .iter()
            .copied()
            .find(|tier| tier.name() == wanted)
            .ok_or_else(|| ChartError::InvalidInput {
                message: format!("Unknown tier: {}", s),
            })
    }
}

/// Which source produced the reported longitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSource {
    Primary,
    Secondary,
}

/// Unvalidated record as handed back by an ephemeris backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBodyRecord {
    pub longitude: f64,
    pub latitude: Option<f64>,
    pub speed: Option<f64>,
}

impl RawBodyRecord {
    pub fn longitude_only(longitude: f64) -> Self {
        Self {
            longitude,
            latitude: None,
            speed: None,
        }
    }
}

/// Validated ecliptic position of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPosition {
    #[serde(rename = "bodyId")]
    pub body: Body,
    /// Ecliptic longitude in degrees (0-360)
    pub longitude_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude_deg: Option<f64>,
    /// Speed in longitude (degrees per day)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_deg_per_day: Option<f64>,
    pub source: PositionSource,
    pub sign_index: u8,
    pub sign: Sign,
    pub dms: Dms,
    pub retrograde: bool,
}

impl BodyPosition {
    /// The one place a backend record becomes a position: rejects non-finite
    /// values and derives sign, DMS and retrograde flag.
    pub fn decode(
        body: Body,
        source: PositionSource,
        raw: RawBodyRecord,
    ) -> Result<Self, ChartError> {
        let reject = |field: &str, value: f64| ChartError::Decode {
            subject: body.id().to_string(),
            message: format!("{} is not finite ({})", field, value),
        };
        if !raw.longitude.is_finite() {
            return Err(reject("longitude", raw.longitude));
        }
        if let Some(lat) = raw.latitude.filter(|v| !v.is_finite()) {
            return Err(reject("latitude", lat));
        }
        if let Some(speed) = raw.speed.filter(|v| !v.is_finite()) {
            return Err(reject("speed", speed));
        }

        let longitude = zodiac::normalize_longitude(raw.longitude);
        let sign_index = zodiac::sign_index(longitude);
        Ok(Self {
            body,
            longitude_deg: longitude,
            latitude_deg: raw.latitude,
            speed_deg_per_day: raw.speed,
            source,
            sign_index,
            sign: Sign::from_index(sign_index),
            dms: zodiac::to_dms(longitude),
            retrograde: raw.speed.map_or(false, |s| s < 0.0),
        })
    }

    pub(crate) fn raw(&self) -> RawBodyRecord {
        RawBodyRecord {
            longitude: self.longitude_deg,
            latitude: self.latitude_deg,
            speed: self.speed_deg_per_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_body_has_one_tier() {
        let luminaries: Vec<_> = Body::ALL
            .iter()
            .filter(|b| b.tier() == Tier::Luminary)
            .collect();
        assert_eq!(luminaries, vec![&Body::Sun, &Body::Moon]);
        assert_eq!(Body::Chiron.tier(), Tier::Other);
        assert_eq!(Body::Pluto.tier(), Tier::Transpersonal);
    }

    #[test]
    fn test_body_ids_round_trip() {
        for body in Body::ALL {
            assert_eq!(body.id().parse::<Body>().unwrap(), body);
        }
        assert!("vulcan".parse::<Body>().is_err());
    }

    #[test]
    fn test_secondary_capable_set() {
        let capable: Vec<_> = Body::ALL
            .iter()
            .filter(|b| b.is_secondary_capable())
            .collect();
        assert_eq!(capable.len(), 10);
        assert!(!Body::Chiron.is_secondary_capable());
    }

    #[test]
    fn test_decode_derives_sign_and_retrograde() {
        let raw = RawBodyRecord {
            longitude: 372.5,
            latitude: Some(1.2),
            speed: Some(-0.3),
        };
        let pos = BodyPosition::decode(Body::Mercury, PositionSource::Primary, raw).unwrap();
        assert!((pos.longitude_deg - 12.5).abs() < 1e-12);
        assert_eq!(pos.sign, Sign::Aries);
        assert_eq!(pos.sign_index, 1);
        assert!(pos.retrograde);
    }

    #[test]
    fn test_decode_rejects_non_finite() {
        let raw = RawBodyRecord::longitude_only(f64::NAN);
        let err = BodyPosition::decode(Body::Sun, PositionSource::Secondary, raw).unwrap_err();
        assert!(matches!(err, ChartError::Decode { .. }));
    }

    #[test]
    fn test_position_json_shape() {
        let pos = BodyPosition::decode(
            Body::NorthNode,
            PositionSource::Primary,
            RawBodyRecord::longitude_only(100.0),
        )
        .unwrap();
        let json = serde_json::to_value(&pos).unwrap();
        assert_eq!(json["bodyId"], "north_node");
        assert_eq!(json["source"], "primary");
        assert_eq!(json["sign"], "Cancer");
        assert!(json.get("speedDegPerDay").is_none());
    }
}
