use crate::ephemeris::types::{Body, BodyPosition};
use crate::zodiac::{Element, Quality, Sign};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Minimum number of bodies in one sign for a stellium
pub const STELLIUM_THRESHOLD: u32 = 3;

/// Counter that remembers the order keys were first seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    entries: Vec<(K, u32)>,
}

impl<K: PartialEq + Copy> Tally<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }

    pub fn count(&self, key: K) -> u32 {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// The `n` largest counts; equal counts keep first-seen order
    pub fn top(&self, n: usize) -> Vec<K> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(k, _)| k).collect()
    }
}

impl<K: PartialEq + Copy> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Serialize> Serialize for Tally<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPatterns {
    pub stelliums: Vec<Sign>,
    pub element_emphasis: Tally<Element>,
    pub quality_emphasis: Tally<Quality>,
}

impl ChartPatterns {
    pub fn dominant_elements(&self) -> Vec<Element> {
        self.element_emphasis.top(2)
    }

    pub fn dominant_qualities(&self) -> Vec<Quality> {
        self.quality_emphasis.top(2)
    }
}

/// Sign, element and quality tallies over the reconciled positions
pub fn analyze_patterns(positions: &BTreeMap<Body, BodyPosition>) -> ChartPatterns {
    let mut signs = Tally::new();
    let mut element_emphasis = Tally::new();
    let mut quality_emphasis = Tally::new();

    for position in positions.values() {
        signs.add(position.sign);
        element_emphasis.add(position.sign.element());
        quality_emphasis.add(position.sign.quality());
    }

    let stelliums = signs
        .iter()
        .filter(|(_, count)| *count >= STELLIUM_THRESHOLD)
        .map(|(sign, _)| sign)
        .collect();

    ChartPatterns {
        stelliums,
        element_emphasis,
        quality_emphasis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_breaks_ties_by_first_seen() {
        let mut tally = Tally::new();
        for e in [Element::Water, Element::Fire, Element::Fire, Element::Water, Element::Air] {
            tally.add(e);
        }
        assert_eq!(tally.top(2), vec![Element::Water, Element::Fire]);
        assert_eq!(tally.count(Element::Earth), 0);
    }

    #[test]
    fn test_tally_serializes_in_insertion_order() {
        let mut tally = Tally::new();
        tally.add(Quality::Mutable);
        tally.add(Quality::Cardinal);
        tally.add(Quality::Mutable);
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"mutable":2,"cardinal":1}"#);
    }
}
