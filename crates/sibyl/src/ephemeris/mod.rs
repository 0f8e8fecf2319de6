pub mod analytic;
pub mod provider;
pub mod reconcile;
pub mod swiss;
pub mod types;

pub use analytic::AnalyticEphemeris;
pub use provider::{PrimaryProvider, SecondaryProvider};
pub use reconcile::{CalibrationTable, PositionReconciler};
pub use swiss::{EphemerisConfig, SwissEphemeris};
pub use types::{Body, BodyPosition, PositionSource, RawBodyRecord, Tier};
