//! The controlled flight's identity

use serde::{Deserialize, Serialize};

use crate::core::types::ObjectId;
use crate::log::event::AmmoCount;

/// Player identity, seeded once from the first player-flagged spawn
///
/// Later events reference either the pilot or the aircraft id, and the log
/// sometimes swaps which field carries which, so attribution checks use
/// `is_controlled` against both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerContext {
    pub pilot_id: ObjectId,
    pub aircraft_id: ObjectId,
    pub pilot_name: String,
    pub aircraft_type: String,
    #[serde(skip)]
    pub starting_ammo: AmmoCount,
}

impl PlayerContext {
    pub fn new(
        pilot_id: ObjectId,
        aircraft_id: ObjectId,
        pilot_name: impl Into<String>,
        aircraft_type: impl Into<String>,
    ) -> Self {
        Self {
            pilot_id,
            aircraft_id,
            pilot_name: pilot_name.into(),
            aircraft_type: aircraft_type.into(),
            starting_ammo: AmmoCount::default(),
        }
    }

    pub fn with_starting_ammo(mut self, ammo: AmmoCount) -> Self {
        self.starting_ammo = ammo;
        self
    }

    /// True for either the pilot or the aircraft id
    pub fn is_controlled(&self, id: ObjectId) -> bool {
        !id.is_none() && (id == self.pilot_id || id == self.aircraft_id)
    }

    /// Known pilot and aircraft ids; a missing id is left out
    pub fn controlled_ids(&self) -> Vec<ObjectId> {
        [self.pilot_id, self.aircraft_id]
            .into_iter()
            .filter(|id| !id.is_none())
            .collect()
    }
}
