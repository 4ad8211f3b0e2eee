//! Reconstruction thresholds with documented constants
//!
//! All magic numbers of the debrief heuristics are collected here with
//! explanations of their purpose and how they interact with each other.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{DebriefError, Result};
use crate::core::types::{Tick, TICKS_PER_SECOND};

/// Configuration for the reconstruction passes
///
/// The defaults reproduce the established debrief behavior. Changing them
/// changes which kills get credited and how the flight ending is labeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebriefConfig {
    // === KILL ATTRIBUTION ===
    /// Minimum share of a target's total damage the player must have dealt
    /// for an unattributed destruction to be credited
    ///
    /// At 0.8 a target that also took some friendly or AI fire is still
    /// credited, while a target the player only grazed is not.
    pub indirect_kill_ratio: f64,

    // === FLIGHT OUTCOME ===
    /// Cumulative pilot damage fraction above which the pilot is wounded
    pub wounded_threshold: f64,

    /// Ticks between pilot separation and the ground event above which the
    /// ending is a parachute descent
    ///
    /// 2000 ticks = 40 s of game time. Shorter gaps mean the separation was
    /// caused by the impact itself.
    pub bailout_separation_ticks: Tick,

    // === LANDING DAMAGE ===
    /// A self-sourced hit must happen less than this many seconds before
    /// the landing/crash to count as landing damage
    pub landing_window_secs: f64,

    /// Seconds that must have passed since the last air kill
    ///
    /// Keeps damage taken during a low-level dogfight out of the landing
    /// bucket.
    pub combat_cooldown_secs: f64,

    /// Maximum height above the estimated airfield elevation (meters)
    pub airfield_altitude_margin: f64,
}

impl Default for DebriefConfig {
    fn default() -> Self {
        Self {
            indirect_kill_ratio: 0.8,
            wounded_threshold: 0.01,
            bailout_separation_ticks: 40 * TICKS_PER_SECOND,
            landing_window_secs: 60.0,
            combat_cooldown_secs: 60.0,
            airfield_altitude_margin: 150.0,
        }
    }
}

impl DebriefConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load thresholds from a TOML file, missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            DebriefError::InputUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let config: DebriefConfig =
            toml::from_str(&content).map_err(|source| DebriefError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate().map_err(DebriefError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.indirect_kill_ratio > 0.0 && self.indirect_kill_ratio <= 1.0) {
            return Err(format!(
                "indirect_kill_ratio ({}) must be in (0, 1]",
                self.indirect_kill_ratio
            ));
        }

        if self.wounded_threshold < 0.0 {
            return Err(format!(
                "wounded_threshold ({}) must not be negative",
                self.wounded_threshold
            ));
        }

        if self.landing_window_secs <= 0.0 || self.combat_cooldown_secs < 0.0 {
            return Err("Landing window must be positive and cooldown non-negative".into());
        }

        if self.airfield_altitude_margin <= 0.0 {
            return Err(format!(
                "airfield_altitude_margin ({}) must be positive",
                self.airfield_altitude_margin
            ));
        }

        Ok(())
    }
}
