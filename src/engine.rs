//! Multi-pass reconstruction of one flight
//!
//! Pass order:
//! 1. Object registry, player identity and damage ledger
//! 2. Kill attribution, direct during the scan then indirect reconciliation
//! 3. Flight outcome and firing accuracy
//! 4. Damage aggregation, landing-damage relabelling and timeline assembly
//!
//! Each pass reads state completed by the one before it. An engine holds only
//! immutable tables, so independent flights may run on separate threads.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accuracy::{AccuracyTracker, FiringAccuracy, WeaponTable};
use crate::attribution::{CreditedKill, KillAttributionResolver};
use crate::core::config::DebriefConfig;
use crate::core::error::{DebriefError, Result};
use crate::damage::{DamageAccumulator, DamageLedger};
use crate::log::{decode, read_log, EventKind, LogEvent};
use crate::outcome::{FlightOutcome, FlightOutcomeClassifier, LandingDamageReclassifier};
use crate::registry::{CategoryTable, ObjectCategory, ObjectRegistry, PlayerContext};
use crate::timeline::{DebriefSummary, MissionInfo, MissionTimeline, TimelineAssembler};

/// Everything reconstructed from one flight log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debrief {
    pub summary: DebriefSummary,
    pub timeline: MissionTimeline,
    /// Absent when no player flew in the log
    pub accuracy: Option<FiringAccuracy>,
}

impl Debrief {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Output of the first pass
struct Scan {
    registry: ObjectRegistry,
    ledger: DamageLedger,
    player: Option<PlayerContext>,
    mission: Option<MissionInfo>,
}

pub struct DebriefEngine {
    config: DebriefConfig,
    categories: CategoryTable,
    weapons: WeaponTable,
}

impl DebriefEngine {
    pub fn new(
        config: DebriefConfig,
        categories: CategoryTable,
        weapons: WeaponTable,
    ) -> Result<Self> {
        config.validate().map_err(DebriefError::Config)?;
        Ok(Self {
            config,
            categories,
            weapons,
        })
    }

    pub fn config(&self) -> &DebriefConfig {
        &self.config
    }

    /// Read and reconstruct a log file
    ///
    /// A missing or unreadable file is the only failure; malformed lines
    /// inside it are skipped.
    pub fn from_path(&self, path: &Path) -> Result<Debrief> {
        let lines = read_log(path)?;
        tracing::info!("Read {} lines from {}", lines.len(), path.display());
        Ok(self.reconstruct(lines))
    }

    pub fn reconstruct<I, S>(&self, lines: I) -> Debrief
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let events = decode(lines);
        self.reconstruct_events(&events)
    }

    pub fn reconstruct_events(&self, events: &[LogEvent]) -> Debrief {
        let Scan {
            mut registry,
            ledger,
            player,
            mission,
        } = self.scan(events);
        if player.is_none() {
            tracing::warn!("No player spawn found, no kills will be credited");
        }

        let kills = self.attribute(events, &mut registry, &ledger, player.clone());

        let mut classifier = FlightOutcomeClassifier::new(&self.config, player.clone());
        let mut tracker = player
            .as_ref()
            .map(|p| AccuracyTracker::new(&self.weapons, p));
        for event in events {
            classifier.observe(event);
            if let Some(tracker) = tracker.as_mut() {
                tracker.observe(event);
            }
        }
        let mut outcome = classifier.finish();
        let accuracy = tracker.map(AccuracyTracker::finish);

        let damage = match &player {
            Some(p) => DamageAccumulator::from_ledger(&ledger, p, &registry),
            None => DamageAccumulator::new(),
        };
        let timeline = self.assemble(&registry, &kills, &damage, player.as_ref(), &mut outcome);

        let credited = kills.iter().filter_map(|k| registry.lookup(k.target));
        let summary =
            DebriefSummary::build(player, mission, credited, &outcome, &damage, &timeline);
        tracing::info!(
            "Reconstructed {} timeline events, outcome {}",
            timeline.len(),
            summary.final_state
        );

        Debrief {
            summary,
            timeline,
            accuracy,
        }
    }

    /// First pass: spawns, player identity and every hit
    fn scan(&self, events: &[LogEvent]) -> Scan {
        let mut registry = ObjectRegistry::new(self.categories.clone());
        let mut ledger = DamageLedger::new();
        let mut player: Option<PlayerContext> = None;
        let mut mission = None;

        for event in events {
            match &event.kind {
                EventKind::MissionStart {
                    game_date,
                    game_time,
                    mission_file,
                } => {
                    if mission.is_none() {
                        mission = Some(MissionInfo {
                            game_date: game_date.clone(),
                            game_time: game_time.clone(),
                            mission_file: mission_file.clone(),
                        });
                    }
                }
                EventKind::AircraftSpawn {
                    aircraft,
                    pilot,
                    name,
                    type_tag,
                    country,
                    is_player,
                    ammo,
                } => {
                    registry.register(*aircraft, name, type_tag, *country);
                    if *is_player && player.is_none() {
                        tracing::debug!(
                            "Player detected: {} in {} (aircraft {}, pilot {})",
                            name,
                            type_tag,
                            aircraft,
                            pilot
                        );
                        player = Some(
                            PlayerContext::new(*pilot, *aircraft, name.clone(), type_tag.clone())
                                .with_starting_ammo(*ammo),
                        );
                    }
                }
                EventKind::ObjectSpawn {
                    id,
                    name,
                    type_tag,
                    country,
                    ..
                } => {
                    registry.register(*id, name, type_tag, *country);
                }
                EventKind::Damage {
                    attacker,
                    target,
                    damage,
                    position,
                } => {
                    ledger.record_hit(
                        *attacker,
                        *target,
                        *damage,
                        event.tick,
                        position.map(|p| p.altitude()),
                    );
                }
                _ => {}
            }
        }

        Scan {
            registry,
            ledger,
            player,
            mission,
        }
    }

    /// Second pass: direct credits in log order, then the indirect pass
    fn attribute(
        &self,
        events: &[LogEvent],
        registry: &mut ObjectRegistry,
        ledger: &DamageLedger,
        player: Option<PlayerContext>,
    ) -> Vec<CreditedKill> {
        let mut resolver = KillAttributionResolver::new(self.config.indirect_kill_ratio, player);
        for event in events {
            if let EventKind::Destroy {
                attacker,
                target,
                position,
            } = &event.kind
            {
                resolver.observe_destroy(
                    registry,
                    *attacker,
                    *target,
                    event.tick,
                    position.map(|p| p.altitude()),
                );
            }
        }
        resolver.reconcile(registry, ledger);
        resolver.into_kills()
    }

    /// Last pass: relabel landing damage, then merge everything
    fn assemble(
        &self,
        registry: &ObjectRegistry,
        kills: &[CreditedKill],
        damage: &DamageAccumulator,
        player: Option<&PlayerContext>,
        outcome: &mut FlightOutcome,
    ) -> MissionTimeline {
        let mut assembler = TimelineAssembler::new();
        assembler.push_takeoff(outcome);

        let mut last_air_kill = None;
        for kill in kills {
            let Some(object) = registry.lookup(kill.target) else {
                continue;
            };
            if assembler.push_kill(kill, object) && object.category == ObjectCategory::Air {
                last_air_kill = last_air_kill.max(Some(kill.tick));
            }
        }

        assembler.push_damage(damage.buckets());
        if let Some(player) = player {
            let reclassifier = LandingDamageReclassifier::new(
                &self.config,
                &player.aircraft_type,
                outcome,
                last_air_kill,
            );
            if reclassifier.apply(assembler.events_mut()) {
                outcome.hard_landing = true;
            }
        }

        assembler.push_terminal(outcome);
        assembler.finish()
    }
}

impl Default for DebriefEngine {
    fn default() -> Self {
        Self {
            config: DebriefConfig::default(),
            categories: CategoryTable::default(),
            weapons: WeaponTable::default(),
        }
    }
}
