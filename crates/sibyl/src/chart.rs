//! Natal chart assembly: time conversion, reconciled positions, houses,
//! aspects, patterns and gate activations in one pass.

use crate::aspects::{AspectCalculator, AspectMap, OrbTable};
use crate::ephemeris::provider::{PrimaryProvider, SecondaryProvider};
use crate::ephemeris::reconcile::{CalibrationTable, PositionReconciler};
use crate::ephemeris::types::{Body, BodyPosition};
use crate::error::ChartError;
use crate::houses::{self, HouseSystem, DEFAULT_HOUSE_SYSTEM};
use crate::human_design::{self, GateActivation};
use crate::patterns::{self, ChartPatterns};
use crate::time::{BirthMoment, JulianMoment};
use crate::zodiac::{Element, Quality, Sign};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_sign: Option<Sign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_sign: Option<Sign>,
    /// Absent when houses could not be divided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rising_sign: Option<Sign>,
    /// Traditional ruler of the rising sign
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_ruler: Option<Body>,
    pub dominant_elements: Vec<Element>,
    pub dominant_qualities: Vec<Quality>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NatalChart {
    pub moment: BirthMoment,
    pub julian: JulianMoment,
    pub positions: BTreeMap<Body, BodyPosition>,
    pub houses: HouseSystem,
    /// House number of each body; empty without houses
    pub placements: BTreeMap<Body, u8>,
    pub aspects: AspectMap,
    pub patterns: ChartPatterns,
    pub interpretations: Interpretations,
    pub gates: BTreeMap<Body, GateActivation>,
}

impl NatalChart {
    pub fn position(&self, body: Body) -> Option<&BodyPosition> {
        self.positions.get(&body)
    }

    pub fn sign_of(&self, body: Body) -> Option<Sign> {
        self.position(body).map(|p| p.sign)
    }
}

/// Builds charts from a pair of providers.
///
/// The engine holds no per-call state; one instance can serve any number of charts.
pub struct ChartEngine<'a> {
    primary: &'a dyn PrimaryProvider,
    secondary: &'a dyn SecondaryProvider,
    calibration: CalibrationTable,
    aspects: AspectCalculator,
    bodies: Vec<Body>,
    house_system: char,
}

impl<'a> ChartEngine<'a> {
    pub fn new(primary: &'a dyn PrimaryProvider, secondary: &'a dyn SecondaryProvider) -> Self {
        Self {
            primary,
            secondary,
            calibration: CalibrationTable::standard(),
            aspects: AspectCalculator::new(),
            bodies: Body::ALL.to_vec(),
            house_system: DEFAULT_HOUSE_SYSTEM,
        }
    }

    pub fn with_calibration(mut self, calibration: CalibrationTable) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_orbs(mut self, orbs: OrbTable) -> Self {
        self.aspects = AspectCalculator::with_orbs(orbs);
        self
    }

    pub fn with_bodies(mut self, bodies: impl IntoIterator<Item = Body>) -> Self {
        self.bodies = bodies.into_iter().collect();
        self
    }

    pub fn with_house_system(mut self, system: char) -> Self {
        self.house_system = system;
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Assemble a natal chart.
    ///
    /// Only an unconvertible birth moment fails the call. Bodies without a
    /// usable position are left out and missing coordinates yield empty houses.
    pub fn natal_chart(
        &self,
        moment: &BirthMoment,
        house_system: Option<char>,
    ) -> Result<NatalChart, ChartError> {
        let julian = JulianMoment::from_birth(moment)?;
        log::debug!(
            "Building chart for JD {} (ET {})",
            julian.julian_day_ut,
            julian.julian_day_et
        );

        let reconciler = PositionReconciler::new(self.primary, self.secondary, &self.calibration);
        let positions = reconciler.reconcile(&self.bodies, &julian);

        let houses = houses::compute_houses(
            self.primary,
            julian.julian_day_ut,
            moment.latitude,
            moment.longitude,
            house_system.unwrap_or(self.house_system),
        );

        let placements = positions
            .iter()
            .filter_map(|(body, p)| houses.house_of(p.longitude_deg).map(|h| (*body, h)))
            .collect();

        let aspects = self.aspects.compute_aspects(&positions);
        let patterns = patterns::analyze_patterns(&positions);
        let gates = gate_activations(&positions);

        let rising_sign = houses.rising_sign();
        let interpretations = Interpretations {
            sun_sign: positions.get(&Body::Sun).map(|p| p.sign),
            moon_sign: positions.get(&Body::Moon).map(|p| p.sign),
            rising_sign,
            chart_ruler: rising_sign.map(|sign| sign.ruler(false)),
            dominant_elements: patterns.dominant_elements(),
            dominant_qualities: patterns.dominant_qualities(),
        };

        Ok(NatalChart {
            moment: *moment,
            julian,
            positions,
            houses,
            placements,
            aspects,
            patterns,
            interpretations,
            gates,
        })
    }
}

fn gate_activations(positions: &BTreeMap<Body, BodyPosition>) -> BTreeMap<Body, GateActivation> {
    positions
        .iter()
        .filter_map(
            |(body, p)| match human_design::longitude_to_activation(p.longitude_deg) {
                Ok(activation) => Some((*body, activation)),
                Err(e) => {
                    log::debug!("No gate for {}: {}", body, e);
                    None
                }
            },
        )
        .collect()
}
