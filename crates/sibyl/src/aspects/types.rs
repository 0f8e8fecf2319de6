use crate::ephemeris::types::{Body, Tier};
use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Canonical aspect angles, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectType {
    Conjunction,
    Semisextile,
    Sextile,
    Quadrature,
    Trigone,
    Quincunx,
    Opposition,
}

impl AspectType {
    pub const ALL: [AspectType; 7] = [
        AspectType::Conjunction,
        AspectType::Semisextile,
        AspectType::Sextile,
        AspectType::Quadrature,
        AspectType::Trigone,
        AspectType::Quincunx,
        AspectType::Opposition,
    ];

    /// Exact angle in degrees
    pub fn angle(self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::Semisextile => 30.0,
            AspectType::Sextile => 60.0,
            AspectType::Quadrature => 90.0,
            AspectType::Trigone => 120.0,
            AspectType::Quincunx => 150.0,
            AspectType::Opposition => 180.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectType::Conjunction => "conjunction",
            AspectType::Semisextile => "semisextile",
            AspectType::Sextile => "sextile",
            AspectType::Quadrature => "quadrature",
            AspectType::Trigone => "trigone",
            AspectType::Quincunx => "quincunx",
            AspectType::Opposition => "opposition",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AspectType::ALL
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| ChartError::invalid_input(format!("Unknown aspect type: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectDirection {
    /// Each body's orb table matched exactly one angle
    Bidirectional,
    Unidirectional,
}

/// One detected aspect between two bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectRecord {
    pub body_a: Body,
    pub body_b: Body,
    pub aspect_type: AspectType,
    pub direction: AspectDirection,
    /// Deviation from the exact angle, degrees
    pub orb_degrees: f64,
}

/// Aspects keyed by the body that was visited first in the pair
pub type AspectMap = BTreeMap<Body, Vec<AspectRecord>>;

/// Orb half-widths (degrees) per tier and aspect
#[derive(Debug, Clone, PartialEq)]
pub struct OrbTable {
    orbs: [[f64; 7]; 5],
}

impl OrbTable {
    pub fn standard() -> Self {
        // columns: 0, 30, 60, 90, 120, 150, 180
        Self {
            orbs: [
                [10.0, 3.0, 5.0, 6.0, 8.0, 5.0, 10.0], // luminary
                [7.0, 2.0, 4.0, 5.0, 6.0, 2.0, 7.0],   // personal
                [6.0, 1.5, 3.0, 4.0, 5.0, 3.0, 6.0],   // social
                [5.0, 1.0, 2.0, 3.0, 4.0, 2.0, 5.0],   // transpersonal
                [5.0, 1.0, 2.0, 3.0, 4.0, 2.0, 5.0],   // other
            ],
        }
    }

    /// The same orb for every tier and aspect
    pub fn uniform(orb: f64) -> Self {
        Self {
            orbs: [[orb; 7]; 5],
        }
    }

    pub fn orb(&self, tier: Tier, aspect: AspectType) -> f64 {
        self.orbs[tier.slot()][aspect.slot()]
    }

    pub fn set(&mut self, tier: Tier, aspect: AspectType, orb: f64) -> &mut Self {
        self.orbs[tier.slot()][aspect.slot()] = orb;
        self
    }
}

impl Default for OrbTable {
    fn default() -> Self {
        Self::standard()
    }
}
