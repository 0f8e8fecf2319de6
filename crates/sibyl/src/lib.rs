//! Sibyl: a deterministic natal chart engine.
//!
//! A [`BirthMoment`] goes in; a serialisable [`NatalChart`] comes out with
//! reconciled body positions, houses, aspects, sign patterns and Human
//! Design gates. Destiny cards and gate lookups are available standalone.

pub mod aspects;
pub mod chart;
pub mod destiny;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod human_design;
pub mod patterns;
pub mod time;
pub mod transit;
pub mod zodiac;

pub use aspects::{AspectCalculator, AspectDirection, AspectRecord, AspectType, OrbTable};
pub use chart::{ChartEngine, Interpretations, NatalChart};
pub use destiny::{get_destiny_card, DestinyCard};
pub use ephemeris::{
    AnalyticEphemeris, Body, BodyPosition, CalibrationTable, EphemerisConfig, PositionSource,
    PrimaryProvider, SecondaryProvider, SwissEphemeris, Tier,
};
pub use error::ChartError;
pub use houses::{HouseSystem, DEFAULT_HOUSE_SYSTEM};
pub use human_design::{longitude_to_activation, longitude_to_gate, GateActivation};
pub use patterns::ChartPatterns;
pub use time::{to_julian_day_et, to_julian_day_ut, BirthMoment, JulianMoment};
pub use transit::{Influence, TransitAspect, TransitAspectType, TransitComparison};
pub use zodiac::{sign_index, to_dms, Dms, Element, Quality, Sign};
