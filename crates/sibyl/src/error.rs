use crate::ephemeris::types::Body;
use thiserror::Error;

/// Errors that can occur while assembling a chart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The primary ephemeris has no support for this body
    #[error("Primary ephemeris does not support body: {body}")]
    ProviderUnavailable { body: Body },
    /// Ephemeris data or configuration failure
    #[error("Ephemeris error: {message}")]
    Ephemeris { message: String },
    /// Every source failed for one body; the body is left out of the chart
    #[error("Position unavailable for {body}: {reason}")]
    PositionUnavailable { body: Body, reason: String },
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
    #[error("No destiny card for calendar day {month}-{day}")]
    InvalidDate { month: u32, day: u32 },
    /// Houses cannot be divided (missing coordinates); charts degrade to no houses
    #[error("House system unavailable: {reason}")]
    HouseSystemUnavailable { reason: String },
    /// A raw record from an ephemeris backend failed validation
    #[error("Malformed ephemeris record for {subject}: {message}")]
    Decode { subject: String, message: String },
}

impl ChartError {
    pub(crate) fn ephemeris(message: impl Into<String>) -> Self {
        ChartError::Ephemeris {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        ChartError::InvalidInput {
            message: message.into(),
        }
    }
}
