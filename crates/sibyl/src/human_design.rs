//! Human Design gate wheel.
//!
//! The 64 gates divide the ecliptic into 5.625 degree arcs starting at
//! 358.25 degrees (gate 25); each gate is split into six lines.

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

const WHEEL_START_DEG: f64 = 358.25;
const GATE_SPAN_DEG: f64 = 5.625;
const LINE_SPAN_DEG: f64 = 0.9375;

/// Gates in wheel order from the start point
const GATE_WHEEL: [u8; 64] = [
    25, 17, 21, 51, 42, 3, 27, 24, 2, 23, 8, 20, 16, 35, 45, 12, 15, 52, 39, 53, 62, 56, 31, 33,
    7, 4, 29, 59, 40, 64, 47, 6, 46, 18, 48, 57, 32, 50, 28, 44, 1, 43, 14, 34, 9, 5, 26, 11, 10,
    58, 38, 54, 61, 60, 41, 19, 13, 49, 30, 55, 37, 63, 22, 36,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateActivation {
    /// 1..=64
    pub gate: u8,
    /// 1..=6
    pub line: u8,
}

fn wheel_offset(longitude: f64) -> Result<f64, ChartError> {
    if !(0.0..360.0).contains(&longitude) {
        return Err(ChartError::invalid_input(format!(
            "Longitude must be in [0, 360), got {}",
            longitude
        )));
    }
    Ok((longitude - WHEEL_START_DEG + 360.0) % 360.0)
}

/// Gate (1..=64) at an ecliptic longitude in [0, 360)
pub fn longitude_to_gate(longitude: f64) -> Result<u8, ChartError> {
    let shifted = wheel_offset(longitude)?;
    let index = ((shifted / GATE_SPAN_DEG).floor() as usize).min(GATE_WHEEL.len() - 1);
    Ok(GATE_WHEEL[index])
}

/// Gate and line at an ecliptic longitude in [0, 360)
pub fn longitude_to_activation(longitude: f64) -> Result<GateActivation, ChartError> {
    let shifted = wheel_offset(longitude)?;
    let index = ((shifted / GATE_SPAN_DEG).floor() as usize).min(GATE_WHEEL.len() - 1);
    let line = ((shifted % GATE_SPAN_DEG) / LINE_SPAN_DEG).floor() as u8 + 1;
    Ok(GateActivation {
        gate: GATE_WHEEL[index],
        line: line.min(6),
    })
}
