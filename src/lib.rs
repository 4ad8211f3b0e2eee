//! Mission Debrief - flight timeline reconstruction from mission logs

pub mod accuracy;
pub mod attribution;
pub mod core;
pub mod damage;
pub mod engine;
pub mod log;
pub mod outcome;
pub mod registry;
pub mod timeline;

pub use engine::{Debrief, DebriefEngine};
