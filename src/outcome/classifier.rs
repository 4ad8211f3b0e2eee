//! Flight outcome state machine
//!
//! `Flying` moves to exactly one terminal state on the first landing/crash
//! event of the player. The `wounded` modifier is orthogonal and sticky.

use serde::{Deserialize, Serialize};

use crate::core::config::DebriefConfig;
use crate::core::types::Tick;
use crate::log::event::{EventKind, LogEvent, TerminalKind};
use crate::registry::PlayerContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightState {
    Flying,
    Landed,
    Crashed,
    BailedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOutcome {
    pub primary_state: FlightState,
    pub wounded: bool,
    /// Set only by the landing-damage pass
    pub hard_landing: bool,
    pub pilot_separation_tick: Option<Tick>,
    pub takeoff_tick: Option<Tick>,
    pub takeoff_altitude: Option<i32>,
    /// Tick of the first landing/crash event
    pub terminal_tick: Option<Tick>,
    pub terminal_altitude: Option<i32>,
    pub terminal_kind: Option<TerminalKind>,
}

impl Default for FlightOutcome {
    fn default() -> Self {
        Self {
            primary_state: FlightState::Flying,
            wounded: false,
            hard_landing: false,
            pilot_separation_tick: None,
            takeoff_tick: None,
            takeoff_altitude: None,
            terminal_tick: None,
            terminal_altitude: None,
            terminal_kind: None,
        }
    }
}

impl FlightOutcome {
    /// Report label, e.g. "Landed (Hard Landing, Wounded)"
    pub fn label(&self) -> String {
        let base = match self.primary_state {
            FlightState::Flying => "Alive",
            FlightState::Landed => "Landed",
            FlightState::Crashed => "Crashed",
            FlightState::BailedOut => "Bailed Out",
        };
        let mut qualifiers = Vec::new();
        if self.hard_landing && self.primary_state == FlightState::Landed {
            qualifiers.push("Hard Landing");
        }
        if self.wounded {
            qualifiers.push("Wounded");
        }
        if qualifiers.is_empty() {
            base.to_string()
        } else {
            format!("{} ({})", base, qualifiers.join(", "))
        }
    }
}

/// Separation followed within the bail-out window by a landing marker
/// (not a crash marker) is read as an abrupt landing survived on the ground.
///
/// This is a heuristic: the log does not tell a pilot knocked out of a
/// wrecked aircraft on touchdown apart from one who stepped out after a rough
/// landing.
pub fn is_abrupt_landing_after_separation(kind: TerminalKind) -> bool {
    kind == TerminalKind::Landing
}

/// Terminal state for the first landing/crash event
pub fn resolve_terminal_state(
    separation_tick: Option<Tick>,
    terminal_tick: Tick,
    kind: TerminalKind,
    bailout_separation_ticks: Tick,
) -> FlightState {
    match separation_tick {
        Some(separated) => {
            let delta = terminal_tick.saturating_sub(separated);
            if delta > bailout_separation_ticks {
                FlightState::BailedOut
            } else if is_abrupt_landing_after_separation(kind) {
                FlightState::Landed
            } else {
                FlightState::Crashed
            }
        }
        None => match kind {
            TerminalKind::Crash => FlightState::Crashed,
            TerminalKind::Landing => FlightState::Landed,
        },
    }
}

pub struct FlightOutcomeClassifier {
    wounded_threshold: f64,
    bailout_separation_ticks: Tick,
    player: Option<PlayerContext>,
    outcome: FlightOutcome,
    pilot_damage: f64,
    paratrooper_seen: bool,
}

impl FlightOutcomeClassifier {
    pub fn new(config: &DebriefConfig, player: Option<PlayerContext>) -> Self {
        Self {
            wounded_threshold: config.wounded_threshold,
            bailout_separation_ticks: config.bailout_separation_ticks,
            player,
            outcome: FlightOutcome::default(),
            pilot_damage: 0.0,
            paratrooper_seen: false,
        }
    }

    /// Feed one event, in log order
    pub fn observe(&mut self, event: &LogEvent) {
        let Some(player) = &self.player else {
            return;
        };

        match &event.kind {
            EventKind::Takeoff { pilot, position } => {
                if player.is_controlled(*pilot) && self.outcome.takeoff_tick.is_none() {
                    self.outcome.takeoff_tick = Some(event.tick);
                    self.outcome.takeoff_altitude = position.map(|p| p.altitude());
                }
            }
            EventKind::Damage { target, damage, .. } => {
                if *target == player.pilot_id && !target.is_none() && *damage > 0.0 {
                    self.pilot_damage += damage;
                    if self.pilot_damage > self.wounded_threshold && !self.outcome.wounded {
                        tracing::debug!(
                            "Pilot wounded at T:{} (cumulative {:.3})",
                            event.tick,
                            self.pilot_damage
                        );
                        self.outcome.wounded = true;
                    }
                }
            }
            EventKind::PilotSeparation { bot, parent } => {
                let matches = !bot.is_none()
                    && *bot == player.pilot_id
                    && *parent == player.aircraft_id;
                if matches && self.outcome.pilot_separation_tick.is_none() {
                    tracing::debug!("Pilot separation at T:{}", event.tick);
                    self.outcome.pilot_separation_tick = Some(event.tick);
                }
            }
            EventKind::LandingOrCrash {
                pilot,
                kind,
                position,
            } => {
                if player.is_controlled(*pilot) && self.outcome.terminal_tick.is_none() {
                    self.outcome.terminal_tick = Some(event.tick);
                    self.outcome.terminal_altitude = position.map(|p| p.altitude());
                    self.outcome.terminal_kind = Some(*kind);
                    self.outcome.primary_state = resolve_terminal_state(
                        self.outcome.pilot_separation_tick,
                        event.tick,
                        *kind,
                        self.bailout_separation_ticks,
                    );
                }
            }
            EventKind::ParachuteSpawn { paratrooper } => {
                self.paratrooper_seen |= *paratrooper;
            }
            _ => {}
        }
    }

    pub fn outcome(&self) -> &FlightOutcome {
        &self.outcome
    }

    /// Apply the end-of-log fallback and return the outcome
    pub fn finish(mut self) -> FlightOutcome {
        if self.paratrooper_seen && self.outcome.primary_state == FlightState::Flying {
            self.outcome.primary_state = FlightState::BailedOut;
        }
        self.outcome
    }
}
