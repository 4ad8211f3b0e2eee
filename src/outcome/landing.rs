//! Damage near touchdown recast as landing damage
//!
//! A hit whose source is the player's own aircraft type is the log's way of
//! reporting terrain contact. Such hits shortly before a landing or crash, far
//! from any air combat and close to the airfield, are relabelled
//! `LandingDamage` and mark the landing as hard.

use crate::core::config::DebriefConfig;
use crate::core::types::{secs_between, Tick};
use crate::outcome::classifier::{FlightOutcome, FlightState};
use crate::timeline::event::{DamageReport, TimelineEvent, TimelineEventKind};

/// Estimated ground altitude of the home airfield
pub fn airfield_elevation(takeoff: Option<i32>, terminal: Option<i32>) -> Option<f64> {
    match (takeoff, terminal) {
        (Some(a), Some(b)) => Some((f64::from(a) + f64::from(b)) / 2.0),
        (Some(a), None) | (None, Some(a)) => Some(f64::from(a)),
        (None, None) => None,
    }
}

pub struct LandingDamageReclassifier<'a> {
    config: &'a DebriefConfig,
    aircraft_type: &'a str,
    terminal_tick: Option<Tick>,
    airfield: Option<f64>,
    last_air_kill: Option<Tick>,
}

impl<'a> LandingDamageReclassifier<'a> {
    /// Only a landed or crashed outcome has a touchdown to judge against
    pub fn new(
        config: &'a DebriefConfig,
        aircraft_type: &'a str,
        outcome: &FlightOutcome,
        last_air_kill: Option<Tick>,
    ) -> Self {
        let terminal_tick = match outcome.primary_state {
            FlightState::Landed | FlightState::Crashed => outcome.terminal_tick,
            FlightState::Flying | FlightState::BailedOut => None,
        };
        Self {
            config,
            aircraft_type,
            terminal_tick,
            airfield: airfield_elevation(outcome.takeoff_altitude, outcome.terminal_altitude),
            last_air_kill,
        }
    }

    pub fn is_landing_damage(&self, tick: Tick, report: &DamageReport) -> bool {
        let Some(terminal) = self.terminal_tick else {
            return false;
        };
        if report.source != self.aircraft_type.trim() {
            return false;
        }

        let before_touchdown = secs_between(tick, terminal);
        if before_touchdown <= 0.0 || before_touchdown >= self.config.landing_window_secs {
            return false;
        }

        if let Some(kill) = self.last_air_kill {
            if secs_between(kill, tick) <= self.config.combat_cooldown_secs {
                return false;
            }
        }

        match (self.airfield, report.altitude) {
            (Some(field), Some(alt)) => f64::from(alt) - field < self.config.airfield_altitude_margin,
            _ => true,
        }
    }

    /// Relabel qualifying damage in place; true if anything changed
    pub fn apply(&self, events: &mut [TimelineEvent]) -> bool {
        let mut changed = false;
        for event in events.iter_mut() {
            let TimelineEventKind::DamageTaken(report) = &event.kind else {
                continue;
            };
            if !self.is_landing_damage(event.tick, report) {
                continue;
            }
            tracing::debug!(
                "Damage at {} from {} reclassified as landing damage",
                event.time,
                report.source
            );
            event.kind = TimelineEventKind::LandingDamage(report.clone());
            changed = true;
        }
        changed
    }
}
