//! Timeline records consumed by the report generator

use serde::{Deserialize, Serialize};

use crate::core::types::{format_ticks, Tick};
use crate::registry::ObjectCategory;

/// Damage taken within one minute of game time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Type of the object that dealt the first hit of the minute
    pub source: String,
    pub aircraft_fraction: f64,
    pub pilot_fraction: f64,
    pub altitude: Option<i32>,
    /// "4.2% aircraft, 19.2% pilot"
    pub damage: String,
}

impl DamageReport {
    pub fn new(
        source: impl Into<String>,
        aircraft_fraction: f64,
        pilot_fraction: f64,
        altitude: Option<i32>,
    ) -> Self {
        Self {
            source: source.into(),
            aircraft_fraction,
            pilot_fraction,
            altitude,
            damage: describe_damage(aircraft_fraction, pilot_fraction),
        }
    }
}

fn describe_damage(aircraft: f64, pilot: f64) -> String {
    let mut parts = Vec::new();
    if aircraft > 0.0 {
        parts.push(format!("{:.1}% aircraft", aircraft * 100.0));
    }
    if pilot > 0.0 {
        parts.push(format!("{:.1}% pilot", pilot * 100.0));
    }
    parts.join(", ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimelineEventKind {
    Takeoff {
        altitude: Option<i32>,
    },
    Kill {
        target: String,
        category: ObjectCategory,
        is_static: bool,
        altitude: Option<i32>,
    },
    #[serde(rename = "Damage Taken")]
    DamageTaken(DamageReport),
    #[serde(rename = "Landing Damage")]
    LandingDamage(DamageReport),
    Landing {
        altitude: Option<i32>,
        hard_landing: bool,
    },
    Crash {
        altitude: Option<i32>,
        hard_landing: bool,
    },
    #[serde(rename = "Bailout")]
    BailedOut {
        altitude: Option<i32>,
    },
    #[serde(rename = "Mission End")]
    MissionEnd,
}

impl TimelineEventKind {
    /// Tie-break order for events sharing a tick
    pub fn priority(&self) -> u8 {
        match self {
            TimelineEventKind::Takeoff { .. } => 0,
            TimelineEventKind::Kill { .. } => 1,
            TimelineEventKind::DamageTaken(_) => 2,
            TimelineEventKind::LandingDamage(_) => 3,
            TimelineEventKind::Landing { .. }
            | TimelineEventKind::Crash { .. }
            | TimelineEventKind::BailedOut { .. } => 4,
            TimelineEventKind::MissionEnd => 5,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TimelineEventKind::Landing { .. }
                | TimelineEventKind::Crash { .. }
                | TimelineEventKind::BailedOut { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub tick: Tick,
    /// HH:MM:SS of game time
    pub time: String,
    #[serde(flatten)]
    pub kind: TimelineEventKind,
}

impl TimelineEvent {
    pub fn new(tick: Tick, kind: TimelineEventKind) -> Self {
        Self {
            tick,
            time: format_ticks(tick),
            kind,
        }
    }
}

/// Chronological order, ties by type priority; stable otherwise
pub fn sort_events(events: &mut [TimelineEvent]) {
    events.sort_by_key(|e| (e.tick, e.kind.priority()));
}
