//! Damage ledger and the player's damage-taken accounting

pub mod accumulator;
pub mod ledger;

pub use accumulator::{attacker_label, DamageAccumulator, DamageBucket};
pub use ledger::{DamageLedger, HitRecord};
