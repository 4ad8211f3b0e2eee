//! Flight outcome and landing damage

pub mod classifier;
pub mod landing;

pub use classifier::{
    is_abrupt_landing_after_separation, resolve_terminal_state, FlightOutcome,
    FlightOutcomeClassifier, FlightState,
};
pub use landing::{airfield_elevation, LandingDamageReclassifier};
