//! Append-only hit log indexed by target
//!
//! All hits are kept for the whole run: unattributed destructions are judged
//! after the log is consumed and may look back arbitrarily far.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, Tick};

/// One damage event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub attacker: ObjectId,
    pub target: ObjectId,
    /// Fraction of the target's total hit points removed by this hit
    pub fraction: f64,
    pub tick: Tick,
    pub altitude: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct DamageLedger {
    hits: Vec<HitRecord>,
    by_target: AHashMap<ObjectId, Vec<usize>>,
}

impl DamageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hit, returns its index in the ledger
    ///
    /// Negative fractions are clamped to zero.
    pub fn record_hit(
        &mut self,
        attacker: ObjectId,
        target: ObjectId,
        fraction: f64,
        tick: Tick,
        altitude: Option<i32>,
    ) -> usize {
        let index = self.hits.len();
        self.hits.push(HitRecord {
            attacker,
            target,
            fraction: fraction.max(0.0),
            tick,
            altitude,
        });
        self.by_target.entry(target).or_default().push(index);
        index
    }

    /// Hits against `target` in log order
    pub fn hits_against(&self, target: ObjectId) -> impl Iterator<Item = &HitRecord> + '_ {
        self.by_target
            .get(&target)
            .into_iter()
            .flatten()
            .map(move |&i| &self.hits[i])
    }

    /// Summed damage dealt to `target` by any attacker in `attackers`
    ///
    /// Hits with no known attacker never count toward anyone.
    pub fn cumulative_fraction_from(&self, attackers: &[ObjectId], target: ObjectId) -> f64 {
        self.hits_against(target)
            .filter(|h| !h.attacker.is_none() && attackers.contains(&h.attacker))
            .map(|h| h.fraction)
            .sum()
    }

    /// Summed damage dealt to `target` by everyone
    pub fn total_fraction_against(&self, target: ObjectId) -> f64 {
        self.hits_against(target).map(|h| h.fraction).sum()
    }

    /// Latest hit that actually removed hit points
    pub fn last_contributing_hit(&self, target: ObjectId) -> Option<&HitRecord> {
        self.hits_against(target).filter(|h| h.fraction > 0.0).last()
    }

    pub fn get(&self, index: usize) -> Option<&HitRecord> {
        self.hits.get(index)
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_indexed_by_target() {
        let mut ledger = DamageLedger::new();
        ledger.record_hit(ObjectId(1), ObjectId(10), 0.3, 100, None);
        ledger.record_hit(ObjectId(2), ObjectId(20), 0.1, 110, None);
        ledger.record_hit(ObjectId(3), ObjectId(10), 0.2, 120, None);

        let ticks: Vec<_> = ledger.hits_against(ObjectId(10)).map(|h| h.tick).collect();
        assert_eq!(ticks, vec![100, 120]);
        assert_eq!(ledger.hits_against(ObjectId(99)).count(), 0);
    }

    #[test]
    fn test_cumulative_fraction() {
        let mut ledger = DamageLedger::new();
        ledger.record_hit(ObjectId(1), ObjectId(10), 0.25, 100, None);
        ledger.record_hit(ObjectId(2), ObjectId(10), 0.25, 110, None);
        ledger.record_hit(ObjectId(1), ObjectId(10), 0.25, 120, None);

        assert_eq!(
            ledger.cumulative_fraction_from(&[ObjectId(1)], ObjectId(10)),
            0.5
        );
        assert_eq!(ledger.total_fraction_against(ObjectId(10)), 0.75);
    }

    #[test]
    fn test_unknown_attacker_never_counted() {
        let mut ledger = DamageLedger::new();
        ledger.record_hit(ObjectId::NONE, ObjectId(10), 0.6, 100, None);
        ledger.record_hit(ObjectId(1), ObjectId(10), 0.4, 110, None);
        assert_eq!(
            ledger.cumulative_fraction_from(&[ObjectId::NONE, ObjectId(1)], ObjectId(10)),
            0.4
        );
    }

    #[test]
    fn test_negative_damage_clamped() {
        let mut ledger = DamageLedger::new();
        let i = ledger.record_hit(ObjectId(1), ObjectId(10), -0.5, 1, None);
        assert_eq!(ledger.get(i).unwrap().fraction, 0.0);
    }

    #[test]
    fn test_last_contributing_hit_skips_zero_damage() {
        let mut ledger = DamageLedger::new();
        ledger.record_hit(ObjectId(1), ObjectId(10), 0.4, 100, None);
        ledger.record_hit(ObjectId(2), ObjectId(10), 0.0, 200, None);
        assert_eq!(ledger.last_contributing_hit(ObjectId(10)).unwrap().tick, 100);
    }
}
