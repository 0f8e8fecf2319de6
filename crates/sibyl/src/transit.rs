//! Natal-versus-today cross aspects.
//!
//! The "today" chart is cast for 12:00 UTC at latitude 0, longitude 0 so
//! transits describe absolute sky positions, independent of the viewer.

use crate::chart::{ChartEngine, NatalChart};
use crate::ephemeris::types::Body;
use crate::error::ChartError;
use crate::time::BirthMoment;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

const TRANSIT_HOUR_UTC: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitAspectType {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl TransitAspectType {
    pub const ALL: [TransitAspectType; 5] = [
        TransitAspectType::Conjunction,
        TransitAspectType::Sextile,
        TransitAspectType::Square,
        TransitAspectType::Trine,
        TransitAspectType::Opposition,
    ];

    pub fn angle(self) -> f64 {
        match self {
            TransitAspectType::Conjunction => 0.0,
            TransitAspectType::Sextile => 60.0,
            TransitAspectType::Square => 90.0,
            TransitAspectType::Trine => 120.0,
            TransitAspectType::Opposition => 180.0,
        }
    }

    /// Fixed half-width of the window, degrees
    pub fn tolerance(self) -> f64 {
        match self {
            TransitAspectType::Sextile => 6.0,
            _ => 8.0,
        }
    }

    pub fn influence(self) -> Influence {
        match self {
            TransitAspectType::Conjunction => Influence::Neutral,
            TransitAspectType::Sextile | TransitAspectType::Trine => Influence::Harmonious,
            TransitAspectType::Square | TransitAspectType::Opposition => Influence::Challenging,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransitAspectType::Conjunction => "conjunction",
            TransitAspectType::Sextile => "sextile",
            TransitAspectType::Square => "square",
            TransitAspectType::Trine => "trine",
            TransitAspectType::Opposition => "opposition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Influence {
    Neutral,
    Harmonious,
    Challenging,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitAspect {
    pub aspect_type: TransitAspectType,
    /// |today - natal| as measured, not folded into [0, 180]
    pub orb: f64,
    /// Distance of `orb` from the exact aspect angle, degrees
    pub deviation: f64,
    pub influence: Influence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitComparison {
    pub natal_chart: NatalChart,
    pub today_chart: NatalChart,
    /// Keyed by body; only bodies with at least one contact appear
    pub cross_aspects: BTreeMap<Body, Vec<TransitAspect>>,
    pub summary_text: String,
}

/// Birth moment of the transit chart for the UTC day containing `now`
pub fn transit_moment(now: DateTime<Utc>) -> BirthMoment {
    BirthMoment::new(now.year(), now.month(), now.day(), TRANSIT_HOUR_UTC, 0, 0, 0.0).at(0.0, 0.0)
}

/// Classify the separation between a transiting and a natal longitude.
///
/// The difference is not folded into [0, 180]: a pair straddling 0 Aries
/// reads as nearly 360 degrees apart and is not classified.
pub fn classify_transit(today_longitude: f64, natal_longitude: f64) -> Vec<TransitAspect> {
    let separation = (today_longitude - natal_longitude).abs();
    TransitAspectType::ALL
        .iter()
        .copied()
        .filter_map(|aspect_type| {
            let deviation = (separation - aspect_type.angle()).abs();
            (deviation <= aspect_type.tolerance()).then_some(TransitAspect {
                aspect_type,
                orb: separation,
                deviation,
                influence: aspect_type.influence(),
            })
        })
        .collect()
}

/// Cross aspects between every body present in both charts
pub fn cross_aspects(natal: &NatalChart, today: &NatalChart) -> BTreeMap<Body, Vec<TransitAspect>> {
    natal
        .positions
        .iter()
        .filter_map(|(body, natal_pos)| {
            let today_pos = today.positions.get(body)?;
            let found = classify_transit(today_pos.longitude_deg, natal_pos.longitude_deg);
            (!found.is_empty()).then_some((*body, found))
        })
        .collect()
}

/// Count-based synthesis of the cross aspects
pub fn summarize(cross: &BTreeMap<Body, Vec<TransitAspect>>) -> String {
    let all: Vec<(Body, &TransitAspect)> = cross
        .iter()
        .flat_map(|(body, aspects)| aspects.iter().map(move |a| (*body, a)))
        .collect();
    if all.is_empty() {
        return "No major transits to the natal chart today.".to_string();
    }

    let count = |influence: Influence| all.iter().filter(|(_, a)| a.influence == influence).count();
    let mut text = format!(
        "{} transit contact{}: {} harmonious, {} challenging, {} neutral.",
        all.len(),
        if all.len() == 1 { "" } else { "s" },
        count(Influence::Harmonious),
        count(Influence::Challenging),
        count(Influence::Neutral),
    );

    if let Some((body, tightest)) = all
        .iter()
        .min_by(|a, b| a.1.deviation.total_cmp(&b.1.deviation))
    {
        let _ = write!(
            text,
            " Tightest: {} {} (within {:.2}°).",
            body,
            tightest.aspect_type.name(),
            tightest.deviation
        );
    }
    text
}

impl ChartEngine<'_> {
    /// Compare a natal chart against the sky at `now`
    pub fn compare_transits_at(
        &self,
        natal: NatalChart,
        now: DateTime<Utc>,
    ) -> Result<TransitComparison, ChartError> {
        let today = self.natal_chart(&transit_moment(now), None)?;
        let cross = cross_aspects(&natal, &today);
        let summary_text = summarize(&cross);
        log::debug!("Transit comparison for {}: {}", now.date_naive(), summary_text);

        Ok(TransitComparison {
            natal_chart: natal,
            today_chart: today,
            cross_aspects: cross,
            summary_text,
        })
    }

    /// Compare a natal chart against today's sky (system clock)
    pub fn compare_transits(&self, natal: NatalChart) -> Result<TransitComparison, ChartError> {
        self.compare_transits_at(natal, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_transit_moment_is_noon_at_null_island() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        let m = transit_moment(now);
        assert_eq!((m.year, m.month, m.day, m.hour), (2024, 3, 9, 12));
        assert_eq!((m.latitude, m.longitude), (Some(0.0), Some(0.0)));
        assert_eq!(m.utc_offset_hours, 0.0);
    }

    #[test]
    fn test_classify_windows() {
        let square = classify_transit(100.0, 13.0);
        assert_eq!(square.len(), 1);
        assert_eq!(square[0].aspect_type, TransitAspectType::Square);
        assert_eq!(square[0].influence, Influence::Challenging);
        assert!((square[0].orb - 87.0).abs() < 1e-9);
        assert!((square[0].deviation - 3.0).abs() < 1e-9);

        // orb past 180 stays as measured (folded it would read 175)
        let opposition = classify_transit(190.0, 5.0);
        assert_eq!(opposition[0].aspect_type, TransitAspectType::Opposition);
        assert!((opposition[0].orb - 185.0).abs() < 1e-9);
        assert!((opposition[0].deviation - 5.0).abs() < 1e-9);

        let sextile = classify_transit(66.0, 0.0);
        assert_eq!(sextile[0].influence, Influence::Harmonious);
        assert!(classify_transit(66.5, 0.0).is_empty());
        assert!(classify_transit(40.0, 0.0).is_empty());
    }

    #[test]
    fn test_separation_is_not_wrapped() {
        // 4 degrees apart across 0 Aries, measured as 352
        let found = classify_transit(358.0, 2.0);
        assert!(found.is_empty());
        let found = classify_transit(2.0, 358.0);
        assert!(found.is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let mut cross = BTreeMap::new();
        cross.insert(Body::Sun, classify_transit(120.5, 0.0));
        cross.insert(Body::Mars, classify_transit(181.0, 0.0));
        let text = summarize(&cross);
        assert!(text.starts_with("2 transit contacts: 1 harmonious, 1 challenging, 0 neutral."));
        assert!(text.ends_with("Tightest: sun trine (within 0.50°)."));
        assert!(!text.contains("natal sun"));
        assert_eq!(summarize(&BTreeMap::new()), "No major transits to the natal chart today.");
    }
}
