use crate::ephemeris::provider::{PrimaryProvider, SecondaryProvider};
use crate::ephemeris::types::{Body, BodyPosition, PositionSource, RawBodyRecord};
use crate::error::ChartError;
use crate::time::JulianMoment;
use std::collections::{BTreeMap, BTreeSet};

/// Bodies whose reported longitude is taken from the secondary formulas
/// even when the primary ephemeris succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationTable {
    overrides: BTreeSet<Body>,
}

impl CalibrationTable {
    /// Every secondary-capable body is overridden
    pub fn standard() -> Self {
        Self::from_bodies(Body::ALL)
    }

    /// No overrides: the primary longitude is always reported
    pub fn empty() -> Self {
        Self {
            overrides: BTreeSet::new(),
        }
    }

    /// Bodies the secondary formulas cannot place are dropped from the table
    pub fn from_bodies(bodies: impl IntoIterator<Item = Body>) -> Self {
        Self {
            overrides: bodies
                .into_iter()
                .filter(|b| b.is_secondary_capable())
                .collect(),
        }
    }

    pub fn overrides_longitude(&self, body: Body) -> bool {
        self.overrides.contains(&body)
    }

    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.overrides.iter().copied()
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Merges the primary and secondary sources into one position per body
pub struct PositionReconciler<'a> {
    primary: &'a dyn PrimaryProvider,
    secondary: &'a dyn SecondaryProvider,
    calibration: &'a CalibrationTable,
}

impl<'a> PositionReconciler<'a> {
    pub fn new(
        primary: &'a dyn PrimaryProvider,
        secondary: &'a dyn SecondaryProvider,
        calibration: &'a CalibrationTable,
    ) -> Self {
        Self {
            primary,
            secondary,
            calibration,
        }
    }

    /// Position of a single body.
    ///
    /// Fails with `PositionUnavailable` only when every source failed.
    pub fn reconcile_body(
        &self,
        body: Body,
        moment: &JulianMoment,
    ) -> Result<BodyPosition, ChartError> {
        let primary = self
            .primary
            .compute_body_position(body, moment)
            .and_then(|raw| BodyPosition::decode(body, PositionSource::Primary, raw));

        match primary {
            Ok(position) => Ok(self.apply_calibration(position, moment)),
            Err(primary_err) => self.fallback(body, moment, primary_err),
        }
    }

    /// Reconcile every requested body; bodies with no usable source are logged and left out
    pub fn reconcile(&self, bodies: &[Body], moment: &JulianMoment) -> BTreeMap<Body, BodyPosition> {
        let mut positions = BTreeMap::new();
        for &body in bodies {
            match self.reconcile_body(body, moment) {
                Ok(position) => {
                    positions.insert(body, position);
                }
                Err(e) => log::warn!("Omitting {} from chart: {}", body, e),
            }
        }
        positions
    }

    fn apply_calibration(&self, position: BodyPosition, moment: &JulianMoment) -> BodyPosition {
        let body = position.body;
        if !self.calibration.overrides_longitude(body) || !self.secondary.supports(body) {
            return position;
        }

        let overridden = self
            .secondary
            .compute_longitude(body, moment)
            .and_then(|longitude| {
                // latitude and speed stay with the primary reading
                let raw = RawBodyRecord {
                    longitude,
                    ..position.raw()
                };
                BodyPosition::decode(body, PositionSource::Secondary, raw)
            });

        match overridden {
            Ok(calibrated) => calibrated,
            Err(e) => {
                log::debug!("Keeping primary longitude for {}: {}", body, e);
                position
            }
        }
    }

    fn fallback(
        &self,
        body: Body,
        moment: &JulianMoment,
        primary_err: ChartError,
    ) -> Result<BodyPosition, ChartError> {
        if !body.is_secondary_capable() || !self.secondary.supports(body) {
            return Err(ChartError::PositionUnavailable {
                body,
                reason: primary_err.to_string(),
            });
        }

        log::debug!("Primary failed for {} ({}); trying secondary", body, primary_err);
        self.secondary
            .compute_longitude(body, moment)
            .and_then(|longitude| {
                BodyPosition::decode(
                    body,
                    PositionSource::Secondary,
                    RawBodyRecord::longitude_only(longitude),
                )
            })
            .map_err(|secondary_err| ChartError::PositionUnavailable {
                body,
                reason: format!("primary: {}; secondary: {}", primary_err, secondary_err),
            })
    }
}
