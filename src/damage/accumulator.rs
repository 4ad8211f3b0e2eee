//! Damage taken by the player, split by airframe and pilot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{Tick, TICKS_PER_MINUTE};
use crate::damage::ledger::{DamageLedger, HitRecord};
use crate::registry::{ObjectRegistry, PlayerContext};

/// Damage taken within one in-game minute
///
/// Simultaneous multi-hit bursts collapse into one bucket. The attacker label
/// and altitude are those of the first hit in the minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageBucket {
    pub first_tick: Tick,
    pub attacker_label: String,
    pub aircraft_fraction: f64,
    pub pilot_fraction: f64,
    pub altitude: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct DamageAccumulator {
    aircraft_total: f64,
    pilot_total: f64,
    buckets: BTreeMap<u64, DamageBucket>,
}

impl DamageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay every ledger hit against the player's aircraft or pilot
    pub fn from_ledger(
        ledger: &DamageLedger,
        player: &PlayerContext,
        registry: &ObjectRegistry,
    ) -> Self {
        let mut acc = Self::new();
        let mut targets = vec![player.aircraft_id];
        if player.pilot_id != player.aircraft_id {
            targets.push(player.pilot_id);
        }
        for id in targets {
            for hit in ledger.hits_against(id) {
                acc.record(hit, player, &attacker_label(registry, hit));
            }
        }
        acc
    }

    /// Account one hit; hits on other targets or without damage are ignored
    pub fn record(&mut self, hit: &HitRecord, player: &PlayerContext, attacker_label: &str) {
        if hit.fraction <= 0.0 || hit.target.is_none() {
            return;
        }
        let on_aircraft = hit.target == player.aircraft_id;
        let on_pilot = hit.target == player.pilot_id;
        if !on_aircraft && !on_pilot {
            return;
        }

        let bucket = self
            .buckets
            .entry(hit.tick / TICKS_PER_MINUTE)
            .or_insert_with(|| DamageBucket {
                first_tick: hit.tick,
                attacker_label: attacker_label.to_string(),
                aircraft_fraction: 0.0,
                pilot_fraction: 0.0,
                altitude: hit.altitude,
            });
        // Hits replayed per target may arrive out of tick order
        if hit.tick < bucket.first_tick {
            bucket.first_tick = hit.tick;
            bucket.attacker_label = attacker_label.to_string();
            bucket.altitude = hit.altitude;
        }

        if on_aircraft {
            self.aircraft_total += hit.fraction;
            bucket.aircraft_fraction += hit.fraction;
        }
        if on_pilot {
            self.pilot_total += hit.fraction;
            bucket.pilot_fraction += hit.fraction;
        }
    }

    pub fn aircraft_total(&self) -> f64 {
        self.aircraft_total
    }

    pub fn pilot_total(&self) -> f64 {
        self.pilot_total
    }

    /// Buckets in chronological order
    pub fn buckets(&self) -> impl Iterator<Item = &DamageBucket> {
        self.buckets.values()
    }
}

/// Display label for the source of a hit
pub fn attacker_label(registry: &ObjectRegistry, hit: &HitRecord) -> String {
    match registry.lookup(hit.attacker) {
        Some(obj) => obj.normalized_type.clone(),
        None => format!("Unknown (ID:{})", hit.attacker),
    }
}
