use crate::aspects::types::{AspectDirection, AspectMap, AspectRecord, AspectType, OrbTable};
use crate::ephemeris::types::{Body, BodyPosition, Tier};
use std::collections::BTreeMap;

/// Angular distance between two longitudes, normalised to [0, 180]
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    let raw_diff = (lon1 - lon2).rem_euclid(360.0);
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Tier-based aspect detector
pub struct AspectCalculator {
    orbs: OrbTable,
}

impl AspectCalculator {
    /// Calculator using the standard orb table
    pub fn new() -> Self {
        Self::with_orbs(OrbTable::standard())
    }

    pub fn with_orbs(orbs: OrbTable) -> Self {
        Self { orbs }
    }

    pub fn orbs(&self) -> &OrbTable {
        &self.orbs
    }

    /// Every aspect whose window for `tier` contains `separation`, ascending by angle
    pub fn matching_aspects(&self, tier: Tier, separation: f64) -> Vec<AspectType> {
        AspectType::ALL
            .iter()
            .copied()
            .filter(|aspect| (separation - aspect.angle()).abs() <= self.orbs.orb(tier, *aspect))
            .collect()
    }

    /// Classify one pair.
    ///
    /// Each body tests the separation against its own tier; the pair counts
    /// when either side matches.
    pub fn calculate_aspect(&self, a: &BodyPosition, b: &BodyPosition) -> Option<AspectRecord> {
        let separation = angular_separation(a.longitude_deg, b.longitude_deg);
        let from_a = self.matching_aspects(a.body.tier(), separation);
        let from_b = self.matching_aspects(b.body.tier(), separation);

        let aspect_type = from_a.first().or_else(|| from_b.first()).copied()?;
        let direction = if from_a.len() == 1 && from_b.len() == 1 {
            AspectDirection::Bidirectional
        } else {
            AspectDirection::Unidirectional
        };

        Some(AspectRecord {
            body_a: a.body,
            body_b: b.body,
            aspect_type,
            direction,
            orb_degrees: (separation - aspect_type.angle()).abs(),
        })
    }

    /// All aspects among `positions`.
    ///
    /// Each pair is stored once, under the body that comes first in
    /// iteration order. Every body gets an entry, possibly empty.
    pub fn compute_aspects(&self, positions: &BTreeMap<Body, BodyPosition>) -> AspectMap {
        let bodies: Vec<&BodyPosition> = positions.values().collect();
        let mut aspects = AspectMap::new();

        for (i, first) in bodies.iter().enumerate() {
            let found: Vec<AspectRecord> = bodies[i + 1..]
                .iter()
                .filter_map(|second| self.calculate_aspect(first, second))
                .collect();
            aspects.insert(first.body, found);
        }

        aspects
    }
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new()
    }
}
