//! Merge the per-pass results into one ordered timeline

use serde::{Deserialize, Serialize};

use crate::attribution::CreditedKill;
use crate::core::types::Tick;
use crate::damage::DamageBucket;
use crate::outcome::{FlightOutcome, FlightState};
use crate::registry::GameObject;
use crate::timeline::event::{sort_events, DamageReport, TimelineEvent, TimelineEventKind};

/// Ordered event list handed to the report generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionTimeline {
    events: Vec<TimelineEvent>,
}

impl MissionTimeline {
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Tick of the landing, crash, bail-out or synthesized mission end
    pub fn end_tick(&self) -> Option<Tick> {
        self.events
            .iter()
            .rev()
            .find(|e| e.kind.is_terminal() || e.kind == TimelineEventKind::MissionEnd)
            .map(|e| e.tick)
    }

    /// Sorting an assembled timeline again leaves it unchanged
    pub fn resort(&mut self) {
        sort_events(&mut self.events);
    }
}

#[derive(Debug, Default)]
pub struct TimelineAssembler {
    events: Vec<TimelineEvent>,
}

impl TimelineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_takeoff(&mut self, outcome: &FlightOutcome) {
        if let Some(tick) = outcome.takeoff_tick {
            self.events.push(TimelineEvent::new(
                tick,
                TimelineEventKind::Takeoff {
                    altitude: outcome.takeoff_altitude,
                },
            ));
        }
    }

    /// Crew objects are never listed; returns whether the kill was added
    pub fn push_kill(&mut self, kill: &CreditedKill, object: &GameObject) -> bool {
        if object.is_crew() || object.is_excluded() {
            return false;
        }
        self.events.push(TimelineEvent::new(
            kill.tick,
            TimelineEventKind::Kill {
                target: object.normalized_type.clone(),
                category: object.category,
                is_static: object.is_static,
                altitude: object.destruction_altitude.or(kill.altitude),
            },
        ));
        true
    }

    pub fn push_damage<'b>(&mut self, buckets: impl IntoIterator<Item = &'b DamageBucket>) {
        for bucket in buckets {
            self.events.push(TimelineEvent::new(
                bucket.first_tick,
                TimelineEventKind::DamageTaken(DamageReport::new(
                    bucket.attacker_label.clone(),
                    bucket.aircraft_fraction,
                    bucket.pilot_fraction,
                    bucket.altitude,
                )),
            ));
        }
    }

    /// The terminal record for a landing, crash or bail-out, if one was logged
    pub fn push_terminal(&mut self, outcome: &FlightOutcome) {
        let Some(tick) = outcome.terminal_tick else {
            return;
        };
        let altitude = outcome.terminal_altitude;
        let kind = match outcome.primary_state {
            FlightState::Landed => TimelineEventKind::Landing {
                altitude,
                hard_landing: outcome.hard_landing,
            },
            FlightState::Crashed => TimelineEventKind::Crash {
                altitude,
                hard_landing: outcome.hard_landing,
            },
            FlightState::BailedOut => TimelineEventKind::BailedOut { altitude },
            FlightState::Flying => return,
        };
        self.events.push(TimelineEvent::new(tick, kind));
    }

    /// Events collected so far, for in-place relabelling
    pub fn events_mut(&mut self) -> &mut [TimelineEvent] {
        &mut self.events
    }

    /// Sort and close the timeline
    ///
    /// Without a terminal record a `MissionEnd` is added at the latest tick
    /// so that a flight duration can still be derived.
    pub fn finish(mut self) -> MissionTimeline {
        let has_terminal = self.events.iter().any(|e| e.kind.is_terminal());
        if !has_terminal {
            if let Some(last) = self.events.iter().map(|e| e.tick).max() {
                self.events
                    .push(TimelineEvent::new(last, TimelineEventKind::MissionEnd));
            }
        }
        sort_events(&mut self.events);
        MissionTimeline {
            events: self.events,
        }
    }
}
