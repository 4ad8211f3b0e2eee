//! Firing accuracy of the player aircraft
//!
//! The log reports every projectile that hit something, but not the misses.
//! Shots fired are recovered from the ammunition carried at spawn and at the
//! player's mission end record, then prorated across projectile, caliber and
//! weapon groups by their share of hits.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{DebriefError, Result};
use crate::core::types::ObjectId;
use crate::log::event::{AmmoCount, EventKind, LogEvent};
use crate::registry::PlayerContext;

/// Secondary blast effects are reported as shots but were never fired
const EXPLOSION: &str = "explosion";

pub const UNKNOWN_CALIBER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub name: String,
    #[serde(default)]
    pub caliber: Option<String>,
    /// Guns that fire this projectile
    #[serde(default)]
    pub weapons: Vec<String>,
}

/// Projectile to caliber and weapon mapping
///
/// ```toml
/// [[projectile]]
/// name = "BULLET_GER_13x64_AP"
/// caliber = "13mm"
/// weapons = ["MG 131"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    #[serde(default, rename = "projectile")]
    pub projectiles: Vec<ProjectileSpec>,
}

impl WeaponTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projectile<I, S>(mut self, name: &str, caliber: &str, weapons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projectiles.push(ProjectileSpec {
            name: name.to_string(),
            caliber: Some(caliber.to_string()),
            weapons: weapons.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            DebriefError::InputUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_toml_str(&content).map_err(|source| DebriefError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn spec(&self, projectile: &str) -> Option<&ProjectileSpec> {
        self.projectiles.iter().find(|p| p.name == projectile)
    }

    pub fn caliber(&self, projectile: &str) -> &str {
        self.spec(projectile)
            .and_then(|p| p.caliber.as_deref())
            .unwrap_or(UNKNOWN_CALIBER)
    }

    pub fn weapons(&self, projectile: &str) -> &[String] {
        self.spec(projectile)
            .map(|p| p.weapons.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitTally {
    pub hits: u32,
    /// Prorated share of the shots fired, when ammunition was tracked
    pub estimated_shots: Option<u32>,
    /// Percent
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiringAccuracy {
    /// False when the ammunition counts do not show any rounds spent
    pub ammo_tracked: bool,
    pub shots: u32,
    pub hits: u32,
    pub accuracy: Option<f64>,
    pub by_projectile: BTreeMap<String, HitTally>,
    pub by_caliber: BTreeMap<String, HitTally>,
    pub by_weapon: BTreeMap<String, HitTally>,
}

pub struct AccuracyTracker<'a> {
    table: &'a WeaponTable,
    aircraft: ObjectId,
    start: AmmoCount,
    end: Option<AmmoCount>,
    hits: u32,
    by_projectile: BTreeMap<String, u32>,
    by_caliber: BTreeMap<String, u32>,
    by_weapon: BTreeMap<String, u32>,
}

impl<'a> AccuracyTracker<'a> {
    pub fn new(table: &'a WeaponTable, player: &PlayerContext) -> Self {
        Self {
            table,
            aircraft: player.aircraft_id,
            start: player.starting_ammo,
            end: None,
            hits: 0,
            by_projectile: BTreeMap::new(),
            by_caliber: BTreeMap::new(),
            by_weapon: BTreeMap::new(),
        }
    }

    pub fn observe(&mut self, event: &LogEvent) {
        match &event.kind {
            EventKind::Shot {
                ammo,
                attacker,
                target,
            } => {
                if *attacker != self.aircraft || self.aircraft.is_none() || target.is_none() {
                    return;
                }
                if ammo.is_empty() || ammo.eq_ignore_ascii_case(EXPLOSION) {
                    return;
                }
                self.record_hit(ammo);
            }
            EventKind::PlayerMissionEnd { aircraft, ammo, .. } => {
                if *aircraft == self.aircraft && !aircraft.is_none() {
                    self.end = Some(*ammo);
                }
            }
            _ => {}
        }
    }

    fn record_hit(&mut self, projectile: &str) {
        self.hits += 1;
        *self.by_projectile.entry(projectile.to_string()).or_default() += 1;
        *self
            .by_caliber
            .entry(self.table.caliber(projectile).to_string())
            .or_default() += 1;
        for weapon in self.table.weapons(projectile) {
            *self.by_weapon.entry(weapon.clone()).or_default() += 1;
        }
    }

    pub fn finish(self) -> FiringAccuracy {
        let fired = self
            .end
            .map(|end| i64::from(self.start.total()) - i64::from(end.total()))
            .unwrap_or(0);
        let ammo_tracked = fired > 0;
        let shots = if ammo_tracked {
            u32::try_from(fired).unwrap_or(u32::MAX)
        } else {
            0
        };
        let total_hits = self.hits;

        let tally = |groups: BTreeMap<String, u32>| -> BTreeMap<String, HitTally> {
            groups
                .into_iter()
                .map(|(name, hits)| {
                    let estimated_shots = (ammo_tracked && total_hits > 0).then(|| {
                        (f64::from(shots) * f64::from(hits) / f64::from(total_hits)) as u32
                    });
                    let accuracy = estimated_shots.and_then(|s| percent(hits, s));
                    (
                        name,
                        HitTally {
                            hits,
                            estimated_shots,
                            accuracy,
                        },
                    )
                })
                .collect()
        };

        FiringAccuracy {
            ammo_tracked,
            shots,
            hits: total_hits,
            accuracy: if ammo_tracked {
                percent(total_hits, shots)
            } else {
                None
            },
            by_projectile: tally(self.by_projectile),
            by_caliber: tally(self.by_caliber),
            by_weapon: tally(self.by_weapon),
        }
    }
}

fn percent(hits: u32, shots: u32) -> Option<f64> {
    (shots > 0).then(|| f64::from(hits) / f64::from(shots) * 100.0)
}
