//! Kill attribution
//!
//! Direct kills name the player's pilot or aircraft as attacker and are
//! credited on the spot. Destructions with no attacker (`AID:-1`) are deferred
//! until the whole log is consumed, then credited if the player dealt at least
//! `indirect_kill_ratio` of all damage the target took. An indirect credit
//! uses the time of the last contributing hit, not the destroy event.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, Tick};
use crate::damage::DamageLedger;
use crate::registry::{ObjectRegistry, PlayerContext};

/// Tolerance for the ratio comparison, so that 0.8 / 1.0 counts as 0.8
const RATIO_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Attribution {
    Direct,
    Indirect { share: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditedKill {
    pub target: ObjectId,
    pub tick: Tick,
    pub altitude: Option<i32>,
    pub attribution: Attribution,
}

/// Unattributed destruction waiting for the reconciliation pass
#[derive(Debug, Clone, PartialEq)]
struct DeferredDestroy {
    target: ObjectId,
    tick: Tick,
    altitude: Option<i32>,
}

pub struct KillAttributionResolver {
    ratio_threshold: f64,
    player: Option<PlayerContext>,
    credited: Vec<CreditedKill>,
    credited_ids: AHashSet<ObjectId>,
    deferred: Vec<DeferredDestroy>,
}

impl KillAttributionResolver {
    /// Without a player nothing is ever credited
    pub fn new(ratio_threshold: f64, player: Option<PlayerContext>) -> Self {
        Self {
            ratio_threshold,
            player,
            credited: Vec::new(),
            credited_ids: AHashSet::new(),
            deferred: Vec::new(),
        }
    }

    /// Judge one destroy event during the log pass
    pub fn observe_destroy(
        &mut self,
        registry: &mut ObjectRegistry,
        attacker: ObjectId,
        target: ObjectId,
        tick: Tick,
        altitude: Option<i32>,
    ) {
        let Some(object) = registry.lookup(target) else {
            tracing::warn!("Destroy event at T:{} for unregistered object {}", tick, target);
            return;
        };
        if object.is_excluded() {
            return;
        }
        let Some(player) = &self.player else {
            return;
        };

        if player.is_controlled(attacker) {
            self.credit(registry, target, tick, altitude, Attribution::Direct);
        } else if attacker.is_none() && !self.deferred.iter().any(|d| d.target == target) {
            self.deferred.push(DeferredDestroy {
                target,
                tick,
                altitude,
            });
        }
    }

    /// Retroactive pass over the deferred destructions
    ///
    /// Must run after every destroy event has been observed so that direct
    /// credits suppress indirect ones.
    pub fn reconcile(&mut self, registry: &mut ObjectRegistry, ledger: &DamageLedger) {
        let Some(player) = self.player.clone() else {
            return;
        };
        let controlled = player.controlled_ids();

        for deferred in std::mem::take(&mut self.deferred) {
            if self.credited_ids.contains(&deferred.target) {
                continue;
            }
            let total = ledger.total_fraction_against(deferred.target);
            if total <= 0.0 {
                continue;
            }
            let share = ledger.cumulative_fraction_from(&controlled, deferred.target) / total;
            if share + RATIO_EPSILON < self.ratio_threshold {
                tracing::trace!(
                    "Not crediting {}: player share {:.2} below {:.2}",
                    deferred.target,
                    share,
                    self.ratio_threshold
                );
                continue;
            }
            let tick = ledger
                .last_contributing_hit(deferred.target)
                .map(|h| h.tick)
                .unwrap_or(deferred.tick);
            tracing::debug!(
                "Indirect kill of {} credited at T:{} (share {:.2})",
                deferred.target,
                tick,
                share
            );
            self.credit(
                registry,
                deferred.target,
                tick,
                deferred.altitude,
                Attribution::Indirect { share },
            );
        }
    }

    fn credit(
        &mut self,
        registry: &mut ObjectRegistry,
        target: ObjectId,
        tick: Tick,
        altitude: Option<i32>,
        attribution: Attribution,
    ) {
        if !self.credited_ids.insert(target) {
            return;
        }
        registry.mark_destroyed(target, tick, altitude);
        self.credited.push(CreditedKill {
            target,
            tick,
            altitude,
            attribution,
        });
    }

    pub fn is_credited(&self, target: ObjectId) -> bool {
        self.credited_ids.contains(&target)
    }

    /// Credited kills ordered by time, then id
    pub fn into_kills(self) -> Vec<CreditedKill> {
        let mut kills = self.credited;
        kills.sort_by_key(|k| (k.tick, k.target));
        kills
    }
}
