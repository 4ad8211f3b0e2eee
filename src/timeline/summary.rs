//! Summary record for the report generator and award scoring

use serde::{Deserialize, Serialize};

use crate::core::types::{format_ticks, Tick};
use crate::damage::DamageAccumulator;
use crate::outcome::{FlightOutcome, FlightState};
use crate::registry::{GameObject, ObjectCategory, PlayerContext};
use crate::timeline::assembler::MissionTimeline;

/// Header of the mission, from the mission start record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionInfo {
    pub game_date: String,
    pub game_time: String,
    pub mission_file: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillCounts {
    pub air: u32,
    pub air_flying: u32,
    pub air_parked: u32,
    /// Vehicles, artillery and buildings
    pub ground: u32,
    pub naval: u32,
}

impl KillCounts {
    /// Tally credited objects; crew and excluded objects are not counted
    pub fn tally<'a>(objects: impl IntoIterator<Item = &'a GameObject>) -> Self {
        let mut counts = Self::default();
        for object in objects {
            if object.is_crew() {
                continue;
            }
            match object.category {
                ObjectCategory::Air => {
                    counts.air += 1;
                    if object.is_static {
                        counts.air_parked += 1;
                    } else {
                        counts.air_flying += 1;
                    }
                }
                ObjectCategory::Naval => counts.naval += 1,
                category if category.is_ground_target() => counts.ground += 1,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebriefSummary {
    pub player: Option<PlayerContext>,
    pub mission: Option<MissionInfo>,
    pub kills: KillCounts,
    /// HH:MM:SS of game time from takeoff to the end of the flight
    pub flight_duration: Option<String>,
    pub wounded: bool,
    pub hard_landing: bool,
    /// Percent, one decimal
    pub aircraft_damage: f64,
    /// Percent, one decimal
    pub pilot_damage: f64,
    pub outcome: FlightState,
    pub final_state: String,
}

impl DebriefSummary {
    pub fn build<'a>(
        player: Option<PlayerContext>,
        mission: Option<MissionInfo>,
        credited: impl IntoIterator<Item = &'a GameObject>,
        outcome: &FlightOutcome,
        damage: &DamageAccumulator,
        timeline: &MissionTimeline,
    ) -> Self {
        Self {
            player,
            mission,
            kills: KillCounts::tally(credited),
            flight_duration: flight_duration(outcome, timeline),
            wounded: outcome.wounded,
            hard_landing: outcome.hard_landing,
            aircraft_damage: as_percent(damage.aircraft_total()),
            pilot_damage: as_percent(damage.pilot_total()),
            outcome: outcome.primary_state,
            final_state: outcome.label(),
        }
    }
}

/// Takeoff to landing or crash, falling back to the mission end
pub fn flight_duration(outcome: &FlightOutcome, timeline: &MissionTimeline) -> Option<String> {
    let takeoff = outcome.takeoff_tick?;
    let end: Tick = outcome.terminal_tick.or_else(|| timeline.end_tick())?;
    Some(format_ticks(end.saturating_sub(takeoff)))
}

fn as_percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}
